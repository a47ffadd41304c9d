//! CLI command implementations

pub mod auto;
pub mod config;
pub mod enqueue;
pub mod watch;
