//! Automatic uploads from well-known directories
//!
//! Which directories are watched is decided by the auto switches of
//! [`UploaderConfig`]. The power and Wi-Fi switches are only reported here;
//! acting on them is up to the upload service.

use crate::{DirectoryWatcher, WatchError};
use camli_core::{UploadService, UploaderConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Camera photos, relative to the storage root
pub const PHOTOS_DIR: &str = "DCIM/Camera";

/// GPS track exports, relative to the storage root
pub const TRACKS_DIR: &str = "gpx";

/// Locations of the auto-upload directories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoDirs {
    pub photos: PathBuf,
    pub tracks: PathBuf,
}

impl AutoDirs {
    /// Standard layout under `storage_root`
    pub fn under(storage_root: &Path) -> Self {
        Self {
            photos: storage_root.join(PHOTOS_DIR),
            tracks: storage_root.join(TRACKS_DIR),
        }
    }
}

/// Set of directory watchers started from the configuration
#[derive(Debug, Default)]
pub struct AutoUploader {
    watchers: Vec<DirectoryWatcher>,
}

impl AutoUploader {
    /// Start one watcher per enabled directory
    ///
    /// Nothing is watched while the master switch is off.
    pub fn start(
        config: &UploaderConfig,
        dirs: &AutoDirs,
        service: Arc<dyn UploadService>,
    ) -> Result<Self, WatchError> {
        if !config.auto {
            info!("Automatic uploads disabled");
            return Ok(Self::default());
        }

        info!(
            "Automatic uploads enabled (require power: {}, require wifi: {})",
            config.auto_require_power, config.auto_require_wifi
        );

        let mut watchers = Vec::new();
        if config.auto_photos {
            watchers.push(DirectoryWatcher::new(service.clone(), &dirs.photos)?);
        }
        if config.auto_mytracks {
            watchers.push(DirectoryWatcher::new(service, &dirs.tracks)?);
        }

        Ok(Self { watchers })
    }

    /// Directories with a watcher, whether or not the backend accepted them
    pub fn directories(&self) -> Vec<&Path> {
        self.watchers.iter().map(|w| w.directory()).collect()
    }

    /// Directories the backend is actually watching
    pub fn watched(&self) -> Vec<&Path> {
        self.watchers
            .iter()
            .filter(|w| w.is_watching())
            .map(|w| w.directory())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.watchers.is_empty()
    }

    /// Stop every watcher
    pub fn stop(&mut self) {
        for watcher in &mut self.watchers {
            watcher.stop();
        }
        self.watchers.clear();
    }
}
