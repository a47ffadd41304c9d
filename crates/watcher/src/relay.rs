//! Forwarding of finished files to the upload service

use crate::event::FileEvent;
use crate::mask::EventMask;
use camli_core::service::{file_url, UploadService};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Event handler that turns finished files into enqueue calls
///
/// Runs on the backend's observer thread. It keeps no state between events,
/// so every event is handled on its own.
#[derive(Clone)]
pub struct UploadRelay {
    directory: PathBuf,
    mask: EventMask,
    service: Arc<dyn UploadService>,
}

impl UploadRelay {
    pub fn new(service: Arc<dyn UploadService>, directory: PathBuf, mask: EventMask) -> Self {
        Self {
            directory,
            mask,
            service,
        }
    }

    /// Handle one event
    ///
    /// Enqueue failures are dropped here. The upload service owns
    /// durability, so a missed enqueue is not retried or buffered.
    pub fn on_event(&self, event: &FileEvent) {
        let Some(relative) = event.path.as_deref() else {
            // Directory-level events carry no file.
            return;
        };

        if event.kind.is_empty() || !self.mask.contains(event.kind) {
            trace!("ignoring {} for {}", event.kind, relative.display());
            return;
        }

        let full_path = self.directory.join(relative);
        debug!("event {} for {}", event.kind, full_path.display());

        let Some(uri) = file_url(&full_path) else {
            warn!("cannot build file locator for {}", full_path.display());
            return;
        };

        if let Err(e) = self.service.enqueue_upload(&uri) {
            debug!("dropping upload of {}: {}", uri, e);
        }
    }
}

impl fmt::Debug for UploadRelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadRelay")
            .field("directory", &self.directory)
            .field("mask", &self.mask)
            .finish_non_exhaustive()
    }
}
