//! Upload service contract
//!
//! The upload service runs out of process and owns the durable queue and the
//! network transport. Callers only hand it file locators. On Unix the service
//! is reached through a local socket speaking one JSON line per request:
//!
//! ```text
//! -> {"method":"enqueueUpload","uri":"file:///storage/photos/IMG_0001.jpg"}
//! <- {"ok":true}
//! <- {"ok":false,"error":"queue full"}
//! ```

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// File name of the service socket inside the runtime directory
pub const SOCKET_NAME: &str = "camli-uploader.sock";

/// How long a single request may wait on the service before giving up
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(10);

/// Why an enqueue call did not go through
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The service is gone or cannot be reached right now
    #[error("upload service unreachable: {0}")]
    Unreachable(#[source] io::Error),

    /// The service answered but refused the request
    #[error("upload service rejected request: {0}")]
    Rejected(String),

    /// The service answered with something we could not understand
    #[error("malformed reply from upload service: {0}")]
    Protocol(String),
}

/// Handle to the upload service
///
/// Implementations are shared across watcher threads.
pub trait UploadService: Send + Sync {
    /// Ask the service to upload the file at `uri`
    ///
    /// On success the service owns the request.
    fn enqueue_upload(&self, uri: &Url) -> Result<(), ServiceError>;
}

/// `file://` locator for an absolute path
///
/// Returns `None` for relative paths.
pub fn file_url(path: &Path) -> Option<Url> {
    Url::from_file_path(path).ok()
}

/// Default socket the service listens on
///
/// Uses the user runtime directory when the platform has one, otherwise the
/// system temp directory.
pub fn default_socket_path() -> PathBuf {
    dirs::runtime_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(SOCKET_NAME)
}

#[derive(Debug, Serialize)]
struct EnqueueRequest<'a> {
    method: &'static str,
    uri: &'a str,
}

#[derive(Debug, Deserialize)]
struct Reply {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

#[cfg(unix)]
pub use socket::SocketUploadService;

#[cfg(unix)]
mod socket {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::os::unix::net::UnixStream;

    /// Upload service stub that talks to the service over a Unix socket
    ///
    /// Every call opens its own connection, so a restarted service is
    /// picked up on the next call without any reconnect logic. A service
    /// that accepts but stays silent is reported as unreachable once the
    /// reply timeout passes.
    #[derive(Debug, Clone)]
    pub struct SocketUploadService {
        socket_path: PathBuf,
        timeout: Duration,
    }

    impl SocketUploadService {
        pub fn new(socket_path: impl Into<PathBuf>) -> Self {
            Self {
                socket_path: socket_path.into(),
                timeout: DEFAULT_REPLY_TIMEOUT,
            }
        }

        /// Override the per-request read and write timeout
        pub fn with_timeout(mut self, timeout: Duration) -> Self {
            self.timeout = timeout;
            self
        }

        pub fn timeout(&self) -> Duration {
            self.timeout
        }

        pub fn socket_path(&self) -> &Path {
            &self.socket_path
        }
    }

    impl UploadService for SocketUploadService {
        fn enqueue_upload(&self, uri: &Url) -> Result<(), ServiceError> {
            let stream = UnixStream::connect(&self.socket_path).map_err(ServiceError::Unreachable)?;
            stream
                .set_read_timeout(Some(self.timeout))
                .and_then(|_| stream.set_write_timeout(Some(self.timeout)))
                .map_err(ServiceError::Unreachable)?;

            let request = EnqueueRequest {
                method: "enqueueUpload",
                uri: uri.as_str(),
            };
            let mut line = serde_json::to_string(&request)
                .map_err(|e| ServiceError::Protocol(e.to_string()))?;
            line.push('\n');

            let mut writer = &stream;
            writer
                .write_all(line.as_bytes())
                .and_then(|_| writer.flush())
                .map_err(ServiceError::Unreachable)?;

            let mut reply = String::new();
            let read = BufReader::new(&stream)
                .read_line(&mut reply)
                .map_err(ServiceError::Unreachable)?;
            if read == 0 {
                return Err(ServiceError::Unreachable(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed before reply",
                )));
            }

            let reply: Reply = serde_json::from_str(reply.trim_end())
                .map_err(|e| ServiceError::Protocol(e.to_string()))?;
            if reply.ok {
                Ok(())
            } else {
                Err(ServiceError::Rejected(
                    reply.error.unwrap_or_else(|| "no reason given".to_string()),
                ))
            }
        }
    }
}
