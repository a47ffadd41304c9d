//! Platform-specific file watching backends
//!
//! Linux and Android register the event mask directly with inotify. Other
//! platforms go through `notify` and filter kinds after translation.

#[cfg(any(target_os = "linux", target_os = "android"))]
mod linux;
#[cfg(any(target_os = "linux", target_os = "android"))]
pub(crate) use linux::Backend;

#[cfg(not(any(target_os = "linux", target_os = "android")))]
mod portable;
#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub(crate) use portable::Backend;
