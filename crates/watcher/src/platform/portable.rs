//! `notify` backend for platforms without inotify
//!
//! The platform watcher reports absolute paths and its own event taxonomy,
//! usually for more kinds than were asked for. Events are translated into
//! one [`FileEvent`] per path and filtered against the requested mask here.

use crate::event::FileEvent;
use crate::mask::EventMask;
use crate::WatchError;
use notify::event::{AccessKind, AccessMode, ModifyKind, RenameMode};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub(crate) struct Backend {
    watcher: Option<RecommendedWatcher>,
    directory: PathBuf,
}

impl Backend {
    pub(crate) fn start<F>(directory: &Path, mask: EventMask, mut handler: F) -> Result<Self, WatchError>
    where
        F: FnMut(FileEvent) + Send + 'static,
    {
        let mut watcher = {
            let directory = directory.to_path_buf();
            notify::recommended_watcher(move |result: notify::Result<notify::Event>| match result {
                Ok(event) => from_notify(&event, &directory)
                    .into_iter()
                    .filter(|file_event| !file_event.kind.is_empty() && mask.contains(file_event.kind))
                    .for_each(&mut handler),
                Err(e) => warn!("watch error in {}: {}", directory.display(), e),
            })
            .map_err(|e| WatchError::Backend(io::Error::other(e)))?
        };

        watcher
            .watch(directory, RecursiveMode::NonRecursive)
            .map_err(|e| WatchError::Directory {
                path: directory.to_path_buf(),
                source: io::Error::other(e),
            })?;

        Ok(Self {
            watcher: Some(watcher),
            directory: directory.to_path_buf(),
        })
    }

    pub(crate) fn stop(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            if let Err(e) = watcher.unwatch(&self.directory) {
                debug!("unwatch {} failed: {}", self.directory.display(), e);
            }
        }
    }
}

impl Drop for Backend {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Translate a notify event into file events for `directory`
///
/// Returns nothing for kinds with no counterpart, including the paired
/// rename summary that repeats an already reported `MOVED_TO`.
fn from_notify(event: &notify::Event, directory: &Path) -> Vec<FileEvent> {
    let Some(kind) = kind_of(&event.kind) else {
        return Vec::new();
    };

    event
        .paths
        .iter()
        .map(|path| {
            let relative = relative_path(path, directory);
            let kind = if kind == EventMask::DELETE && relative.is_none() {
                EventMask::DELETE_SELF
            } else {
                kind
            };
            FileEvent { kind, path: relative }
        })
        .collect()
}

fn kind_of(kind: &EventKind) -> Option<EventMask> {
    let mask = match kind {
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => EventMask::CLOSE_WRITE,
        EventKind::Access(AccessKind::Close(_)) => EventMask::CLOSE_NOWRITE,
        EventKind::Access(AccessKind::Open(_)) => EventMask::OPEN,
        EventKind::Access(_) => EventMask::ACCESS,
        EventKind::Create(_) => EventMask::CREATE,
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => EventMask::MOVED_TO,
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => EventMask::MOVED_FROM,
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => return None,
        EventKind::Modify(ModifyKind::Name(_)) => EventMask::MOVE_SELF,
        EventKind::Modify(ModifyKind::Metadata(_)) => EventMask::ATTRIB,
        EventKind::Modify(_) => EventMask::MODIFY,
        EventKind::Remove(_) => EventMask::DELETE,
        EventKind::Any | EventKind::Other => return None,
    };
    Some(mask)
}

/// Path of `path` inside `directory`, `None` for the directory itself or
/// anything outside it
fn relative_path(path: &Path, directory: &Path) -> Option<PathBuf> {
    let relative = path.strip_prefix(directory).ok()?;
    if relative.as_os_str().is_empty() {
        None
    } else {
        Some(relative.to_path_buf())
    }
}
