//! inotify backend
//!
//! The watch is registered with exactly the requested mask, so the kernel
//! never queues other kinds. Events are read on a dedicated observer thread
//! that blocks in `read(2)`; removing the watch makes the kernel queue
//! `IN_IGNORED`, which wakes the thread so it can exit.

use crate::event::FileEvent;
use crate::mask::EventMask;
use crate::WatchError;
use inotify::{Inotify, WatchDescriptor, WatchMask, Watches};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

const EVENT_BUFFER_SIZE: usize = 4096;

pub(crate) struct Backend {
    watches: Watches,
    descriptor: WatchDescriptor,
    stopping: Arc<AtomicBool>,
    observer: Option<JoinHandle<()>>,
}

impl Backend {
    pub(crate) fn start<F>(directory: &Path, mask: EventMask, handler: F) -> Result<Self, WatchError>
    where
        F: FnMut(FileEvent) + Send + 'static,
    {
        let inotify = Inotify::init().map_err(WatchError::Backend)?;
        let mut watches = inotify.watches();
        let descriptor = watches
            .add(directory, WatchMask::from_bits_truncate(mask.bits()))
            .map_err(|source| WatchError::Directory {
                path: directory.to_path_buf(),
                source,
            })?;

        let stopping = Arc::new(AtomicBool::new(false));
        let observer = thread::Builder::new()
            .name("file-observer".to_string())
            .spawn({
                let stopping = stopping.clone();
                let directory = directory.to_path_buf();
                move || observe(inotify, directory, handler, stopping)
            })
            .map_err(WatchError::Backend)?;

        Ok(Self {
            watches,
            descriptor,
            stopping,
            observer: Some(observer),
        })
    }

    pub(crate) fn stop(&mut self) {
        let Some(observer) = self.observer.take() else {
            return;
        };

        self.stopping.store(true, Ordering::Release);
        // Fails once the kernel dropped the watch itself (directory deleted);
        // the observer has already seen IN_IGNORED in that case.
        if let Err(e) = self.watches.remove(self.descriptor.clone()) {
            debug!("inotify watch already gone: {}", e);
        }
        if observer.join().is_err() {
            warn!("file observer thread panicked");
        }
    }
}

impl Drop for Backend {
    fn drop(&mut self) {
        self.stop();
    }
}

fn observe<F>(mut inotify: Inotify, directory: PathBuf, mut handler: F, stopping: Arc<AtomicBool>)
where
    F: FnMut(FileEvent),
{
    let mut buffer = [0u8; EVENT_BUFFER_SIZE];

    loop {
        let events = match inotify.read_events_blocking(&mut buffer) {
            Ok(events) => events,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("reading events for {} failed: {}", directory.display(), e);
                return;
            }
        };

        let mut watch_removed = false;
        for event in events {
            if event.mask.contains(inotify::EventMask::IGNORED) {
                watch_removed = true;
                continue;
            }
            if event.mask.contains(inotify::EventMask::Q_OVERFLOW) {
                warn!("event queue overflowed for {}, some files were missed", directory.display());
                continue;
            }
            if stopping.load(Ordering::Acquire) {
                continue;
            }

            handler(FileEvent {
                kind: EventMask::from_bits_truncate(event.mask.bits()),
                path: event.name.map(PathBuf::from),
            });
        }

        if watch_removed || stopping.load(Ordering::Acquire) {
            debug!("observer for {} exiting", directory.display());
            return;
        }
    }
}
