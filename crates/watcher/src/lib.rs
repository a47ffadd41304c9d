//! Directory watching for the Camlistore uploader
//!
//! This crate provides:
//! - [`DirectoryWatcher`]: watches one existing directory and hands every
//!   finished file to the upload service
//! - [`AutoUploader`]: starts watchers for the directories enabled in the
//!   uploader configuration
//!
//! A file counts as finished when its writer closes it (`CLOSE_WRITE`) or
//! when it is renamed into the directory (`MOVED_TO`). Earlier events such
//! as `CREATE` or `MODIFY` fire on partial content and are ignored.

pub mod auto;
pub mod event;
pub mod mask;
mod platform;
pub mod relay;

pub use auto::{AutoDirs, AutoUploader};
pub use event::FileEvent;
pub use mask::EventMask;
pub use relay::UploadRelay;

use camli_core::UploadService;
use platform::Backend;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that prevent a watcher from being built
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("failed to start file watcher: {0}")]
    Backend(#[source] io::Error),

    #[error("cannot watch {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to resolve working directory: {0}")]
    CurrentDir(#[source] io::Error),
}

/// Watches a single directory and forwards finished files for upload
///
/// The directory must exist when the watcher is built. If it does not, no
/// events are ever reported, even once the directory appears.
pub struct DirectoryWatcher {
    directory: PathBuf,
    mask: EventMask,
    inner: Option<Backend>,
}

impl DirectoryWatcher {
    /// Start watching `directory`, sending finished files to `service`
    ///
    /// Events are handled on a dedicated observer thread. A relative
    /// `directory` is resolved against the current working directory.
    pub fn new(
        service: Arc<dyn UploadService>,
        directory: impl AsRef<Path>,
    ) -> Result<Self, WatchError> {
        let directory = absolute(directory.as_ref())?;
        let mask = EventMask::UPLOAD_READY;
        let relay = UploadRelay::new(service, directory.clone(), mask);

        debug!("Starting to watch: {} ({})", directory.display(), mask);
        let inner = match Backend::start(&directory, mask, move |event| relay.on_event(&event)) {
            Ok(backend) => Some(backend),
            Err(WatchError::Directory { path, source }) => {
                warn!(
                    "not watching {}: {} (files there will not be uploaded, even if it is created later)",
                    path.display(),
                    source
                );
                None
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            directory,
            mask,
            inner,
        })
    }

    /// Absolute path of the watched directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Event kinds registered with the backend
    pub fn mask(&self) -> EventMask {
        self.mask
    }

    /// Whether the backend accepted the directory
    pub fn is_watching(&self) -> bool {
        self.inner.is_some()
    }

    /// Stop watching
    ///
    /// Events still queued are discarded.
    pub fn stop(&mut self) {
        if let Some(mut inner) = self.inner.take() {
            inner.stop();
            debug!("Stopped watching: {}", self.directory.display());
        }
    }
}

impl Drop for DirectoryWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for DirectoryWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryWatcher")
            .field("directory", &self.directory)
            .field("mask", &self.mask)
            .field("watching", &self.is_watching())
            .finish()
    }
}

fn absolute(path: &Path) -> Result<PathBuf, WatchError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(WatchError::CurrentDir)?;
    Ok(cwd.join(path))
}
