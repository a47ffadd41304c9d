//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use camli_core::service::default_socket_path;
use camli_core::UploadService;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

/// Log file name inside `--log-dir`
pub const LOG_FILE_NAME: &str = "camli-uploader.log";

/// Log level for a `-v` count
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the global subscriber
///
/// Logs always go to stderr; with `log_dir` they are also appended to
/// [`LOG_FILE_NAME`] there. The returned guard flushes the file on drop.
pub fn init_tracing(verbosity: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = level_for(verbosity);
    let stderr = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let Some(log_dir) = log_dir else {
        tracing_subscriber::registry().with(level).with(stderr).init();
        return Ok(None);
    };

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, LOG_FILE_NAME));
    let file = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(level)
        .with(stderr)
        .with(file)
        .init();
    Ok(Some(guard))
}

/// Config file to use: the explicit path or the platform default
pub fn resolve_config_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => camli_core::config::config_file_path()
            .context("Could not determine config file path (use --config)"),
    }
}

/// Handle to the upload service behind `socket` (or the default socket)
#[cfg(unix)]
pub fn upload_service(socket: Option<PathBuf>) -> Result<Arc<dyn UploadService>> {
    let socket = socket.unwrap_or_else(default_socket_path);
    tracing::debug!("Using upload service at {}", socket.display());
    Ok(Arc::new(camli_core::SocketUploadService::new(socket)))
}

#[cfg(not(unix))]
pub fn upload_service(socket: Option<PathBuf>) -> Result<Arc<dyn UploadService>> {
    let socket = socket.unwrap_or_else(default_socket_path);
    anyhow::bail!(
        "Upload service socket {} needs a Unix platform",
        socket.display()
    )
}

/// Block until Ctrl-C
pub async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    tracing::info!("Shutting down");
    Ok(())
}
