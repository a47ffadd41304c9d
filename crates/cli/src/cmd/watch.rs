//! Watch directories until interrupted

use crate::util;
use anyhow::Result;
use camli_watcher::DirectoryWatcher;
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub async fn run(dirs: &[PathBuf], socket: Option<PathBuf>) -> Result<()> {
    let service = util::upload_service(socket)?;

    let mut watchers = Vec::with_capacity(dirs.len());
    for dir in dirs {
        let watcher = DirectoryWatcher::new(service.clone(), dir)?;
        if watcher.is_watching() {
            println!("{} Watching {}", "✓".green(), watcher.directory().display());
        } else {
            println!(
                "{} Not watching {} (directory must exist before watching starts)",
                "!".yellow(),
                watcher.directory().display()
            );
        }
        watchers.push(watcher);
    }

    if !watchers.iter().any(|w| w.is_watching()) {
        anyhow::bail!("None of the given directories could be watched");
    }

    util::wait_for_shutdown().await?;

    for watcher in &mut watchers {
        watcher.stop();
    }
    Ok(())
}
