//! End-to-end tests against the platform file watcher
//!
//! Real files are written into temp directories and the enqueue calls that
//! reach the upload service are observed through a channel.

#![cfg(target_os = "linux")]

use camli_core::{ServiceError, UploadService};
use camli_watcher::{AutoDirs, AutoUploader, DirectoryWatcher};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::fs;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use url::Url;

const WAIT: Duration = Duration::from_secs(5);
const QUIET: Duration = Duration::from_millis(500);

/// Upload service that reports every enqueue on a channel
struct ChannelService {
    tx: Sender<Url>,
    fail_first: AtomicBool,
}

impl ChannelService {
    fn new() -> (Arc<Self>, Receiver<Url>) {
        let (tx, rx) = unbounded();
        let service = Arc::new(Self {
            tx,
            fail_first: AtomicBool::new(false),
        });
        (service, rx)
    }

    fn failing_first() -> (Arc<Self>, Receiver<Url>) {
        let (service, rx) = Self::new();
        service.fail_first.store(true, Ordering::SeqCst);
        (service, rx)
    }
}

impl UploadService for ChannelService {
    fn enqueue_upload(&self, uri: &Url) -> Result<(), ServiceError> {
        self.tx.send(uri.clone()).unwrap();
        if self.fail_first.swap(false, Ordering::SeqCst) {
            return Err(ServiceError::Unreachable(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "service restarting",
            )));
        }
        Ok(())
    }
}

fn expected(dir: &std::path::Path, name: &str) -> Url {
    Url::from_file_path(dir.join(name)).unwrap()
}

#[test]
fn test_written_file_is_enqueued_once() {
    let temp_dir = TempDir::new().unwrap();
    let (service, rx) = ChannelService::new();
    let _watcher = DirectoryWatcher::new(service, temp_dir.path()).unwrap();

    // Open for writing, write, close: CREATE, OPEN, MODIFY, CLOSE_WRITE
    let path = temp_dir.path().join("IMG_0001.jpg");
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(b"\xff\xd8\xff\xe0 not really a jpeg").unwrap();
    drop(file);

    // Reading it back only produces OPEN and CLOSE_NOWRITE
    fs::read(&path).unwrap();

    let uri = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(uri, expected(temp_dir.path(), "IMG_0001.jpg"));
    assert!(rx.recv_timeout(QUIET).is_err());
}

#[test]
fn test_rename_into_directory_is_enqueued() {
    let staging = TempDir::new().unwrap();
    let watched = TempDir::new().unwrap();
    let (service, rx) = ChannelService::new();

    let partial = staging.path().join("track.gpx.part");
    fs::write(&partial, "<gpx/>").unwrap();

    let _watcher = DirectoryWatcher::new(service, watched.path()).unwrap();
    fs::rename(&partial, watched.path().join("track.gpx")).unwrap();

    let uri = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(uri, expected(watched.path(), "track.gpx"));
    assert!(rx.recv_timeout(QUIET).is_err());
}

#[test]
fn test_rename_within_directory_is_enqueued_once() {
    let temp_dir = TempDir::new().unwrap();
    let partial = temp_dir.path().join(".track.gpx.tmp");
    fs::write(&partial, "<gpx/>").unwrap();

    let (service, rx) = ChannelService::new();
    let _watcher = DirectoryWatcher::new(service, temp_dir.path()).unwrap();
    fs::rename(&partial, temp_dir.path().join("track.gpx")).unwrap();

    let uri = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(uri, expected(temp_dir.path(), "track.gpx"));
    assert!(rx.recv_timeout(QUIET).is_err());
}

#[test]
fn test_failed_enqueue_does_not_block_next_file() {
    let temp_dir = TempDir::new().unwrap();
    let (service, rx) = ChannelService::failing_first();
    let _watcher = DirectoryWatcher::new(service, temp_dir.path()).unwrap();

    fs::write(temp_dir.path().join("a"), "a").unwrap();
    let first = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(first, expected(temp_dir.path(), "a"));

    fs::write(temp_dir.path().join("b"), "b").unwrap();
    let second = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(second, expected(temp_dir.path(), "b"));
}

#[test]
fn test_subdirectory_creation_is_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let (service, rx) = ChannelService::new();
    let _watcher = DirectoryWatcher::new(service, temp_dir.path()).unwrap();

    fs::create_dir(temp_dir.path().join("burst")).unwrap();
    fs::remove_dir(temp_dir.path().join("burst")).unwrap();

    assert!(rx.recv_timeout(QUIET).is_err());
}

#[test]
fn test_directory_created_later_is_never_watched() {
    let temp_dir = TempDir::new().unwrap();
    let gpx = temp_dir.path().join("gpx");
    let (service, rx) = ChannelService::new();

    let watcher = DirectoryWatcher::new(service, &gpx).unwrap();
    assert!(!watcher.is_watching());

    fs::create_dir(&gpx).unwrap();
    fs::write(gpx.join("track.gpx"), "<gpx/>").unwrap();

    assert!(rx.recv_timeout(QUIET).is_err());
}

#[test]
fn test_stopped_watcher_reports_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let (service, rx) = ChannelService::new();
    let mut watcher = DirectoryWatcher::new(service, temp_dir.path()).unwrap();

    watcher.stop();
    fs::write(temp_dir.path().join("late.jpg"), "x").unwrap();

    assert!(rx.recv_timeout(QUIET).is_err());
}

#[test]
fn test_auto_uploader_watches_enabled_directories() {
    let storage = TempDir::new().unwrap();
    let dirs = AutoDirs::under(storage.path());
    fs::create_dir_all(&dirs.photos).unwrap();
    fs::create_dir_all(&dirs.tracks).unwrap();

    let config = camli_core::UploaderConfig {
        host: Some("camli.local".into()),
        auto: true,
        auto_photos: true,
        ..Default::default()
    };
    let (service, rx) = ChannelService::new();
    let _auto = AutoUploader::start(&config, &dirs, service).unwrap();

    fs::write(dirs.tracks.join("ignored.gpx"), "<gpx/>").unwrap();
    fs::write(dirs.photos.join("IMG_0002.jpg"), "jpeg").unwrap();

    let uri = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(uri, expected(&dirs.photos, "IMG_0002.jpg"));
    assert!(rx.recv_timeout(QUIET).is_err());
}

#[test]
fn test_stop_returns_while_service_is_silent() {
    use camli_core::SocketUploadService;
    use std::os::unix::net::UnixListener;
    use std::thread;

    let socket_dir = TempDir::new().unwrap();
    let socket_path = socket_dir.path().join("uploader.sock");
    let listener = UnixListener::bind(&socket_path).unwrap();
    let (accepted_tx, accepted_rx) = unbounded::<()>();
    let (release_tx, release_rx) = unbounded::<()>();
    let server = thread::spawn(move || {
        let (_stream, _) = listener.accept().unwrap();
        accepted_tx.send(()).unwrap();
        // Never reply
        let _ = release_rx.recv();
    });

    let temp_dir = TempDir::new().unwrap();
    let service =
        Arc::new(SocketUploadService::new(&socket_path).with_timeout(Duration::from_millis(300)));
    let mut watcher = DirectoryWatcher::new(service, temp_dir.path()).unwrap();

    fs::write(temp_dir.path().join("a.jpg"), b"photo").unwrap();
    accepted_rx.recv_timeout(WAIT).unwrap();

    let (stopped_tx, stopped_rx) = unbounded::<()>();
    let stopper = thread::spawn(move || {
        watcher.stop();
        stopped_tx.send(()).unwrap();
    });

    assert!(stopped_rx.recv_timeout(WAIT).is_ok());
    stopper.join().unwrap();
    release_tx.send(()).unwrap();
    server.join().unwrap();
}
