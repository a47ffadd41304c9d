//! Enqueue a single file with the upload service

use crate::util;
use anyhow::{Context, Result};
use camli_core::file_url;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

pub async fn run(file: &Path, socket: Option<PathBuf>) -> Result<()> {
    let file = file
        .canonicalize()
        .with_context(|| format!("Cannot find {}", file.display()))?;
    if !file.is_file() {
        anyhow::bail!("Not a regular file: {}", file.display());
    }

    let uri = file_url(&file)
        .with_context(|| format!("Cannot build file locator for {}", file.display()))?;
    let service = util::upload_service(socket)?;

    // The socket call blocks; keep it off the runtime threads
    let sent = uri.clone();
    tokio::task::spawn_blocking(move || service.enqueue_upload(&sent))
        .await
        .context("Enqueue task failed")?
        .with_context(|| format!("Failed to enqueue {}", uri))?;

    println!("{} Enqueued {}", "✓".green(), uri);
    Ok(())
}
