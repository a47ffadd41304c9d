//! Shared pieces of the Camlistore uploader
//!
//! This crate provides:
//! - The preference key catalog (`prefs`)
//! - Persisted preference values (`config`)
//! - The upload service contract and its socket stub (`service`)

pub mod config;
pub mod prefs;
pub mod service;

// Re-exports
pub use config::{ConfigError, UploaderConfig};
pub use prefs::PreferenceKey;
pub use service::{file_url, ServiceError, UploadService};

#[cfg(unix)]
pub use service::SocketUploadService;
