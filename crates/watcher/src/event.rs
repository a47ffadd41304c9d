//! File events relative to a watched directory

use crate::mask::EventMask;
use std::path::PathBuf;

/// A single event in a watched directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    /// Exactly one kind bit
    pub kind: EventMask,
    /// Path relative to the watched directory, `None` for directory-level events
    pub path: Option<PathBuf>,
}

impl FileEvent {
    pub fn new(kind: EventMask, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: Some(path.into()),
        }
    }

    /// Event about the watched directory itself
    pub fn directory(kind: EventMask) -> Self {
        Self { kind, path: None }
    }
}
