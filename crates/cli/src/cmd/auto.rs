//! Run automatic uploads from the configured directories

use crate::util;
use anyhow::{Context, Result};
use camli_core::UploaderConfig;
use camli_watcher::{AutoDirs, AutoUploader};
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub async fn run(
    config_path: Option<PathBuf>,
    storage_root: Option<PathBuf>,
    socket: Option<PathBuf>,
) -> Result<()> {
    let config_path = util::resolve_config_path(config_path)?;
    let config = UploaderConfig::load(&config_path)?;
    config.validate().context("Invalid configuration")?;

    if !config.auto {
        println!(
            "{}",
            "Automatic uploads are off. Enable with: camli-uploader config set camli.auto true"
                .yellow()
        );
        return Ok(());
    }

    let storage_root = match storage_root {
        Some(root) => root,
        None => dirs::home_dir().context("Could not determine home directory (use --storage-root)")?,
    };
    let dirs = AutoDirs::under(&storage_root);
    let service = util::upload_service(socket)?;

    let mut auto = AutoUploader::start(&config, &dirs, service)?;
    for dir in auto.directories() {
        if auto.watched().contains(&dir) {
            println!("{} Watching {}", "✓".green(), dir.display());
        } else {
            println!("{} Not watching {} (missing)", "!".yellow(), dir.display());
        }
    }
    if auto.is_empty() {
        println!("{}", "No auto directories enabled".yellow());
        return Ok(());
    }
    if auto.watched().is_empty() {
        anyhow::bail!("None of the auto directories could be watched");
    }

    util::wait_for_shutdown().await?;
    auto.stop();
    Ok(())
}
