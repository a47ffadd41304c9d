//! Event kinds and masks
//!
//! Bit values follow Linux inotify so masks read the same in logs as they do
//! in `inotify(7)`.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Set of file event kinds
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EventMask: u32 {
        const ACCESS        = 0x0000_0001;
        const MODIFY        = 0x0000_0002;
        const ATTRIB        = 0x0000_0004;
        /// Writable file was closed
        const CLOSE_WRITE   = 0x0000_0008;
        const CLOSE_NOWRITE = 0x0000_0010;
        const OPEN          = 0x0000_0020;
        const MOVED_FROM    = 0x0000_0040;
        /// Entry was renamed into the directory
        const MOVED_TO      = 0x0000_0080;
        const CREATE        = 0x0000_0100;
        const DELETE        = 0x0000_0200;
        const DELETE_SELF   = 0x0000_0400;
        const MOVE_SELF     = 0x0000_0800;

        /// Kinds that mark a file as finished and ready to upload
        const UPLOAD_READY  = Self::CLOSE_WRITE.bits() | Self::MOVED_TO.bits();
    }
}

impl fmt::Display for EventMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}
