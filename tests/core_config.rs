use snapweb_shim::snappy::timesyncd::read_ntp_server;
use snapweb_shim::snappy::{FindOptions, Icon, ResultInfo, ServerVersion, Snap, SnapOptions};
use snapweb_shim::{RemoteError, SnapdAdapter, SnapdClient};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Client that must never be reached; core config is purely local.
struct Offline;

impl SnapdClient for Offline {
    fn icon(&self, _name: &str) -> Result<Icon, RemoteError> {
        unreachable!("core config must not call snapd")
    }

    fn snap(&self, _name: &str) -> Result<(Snap, ResultInfo), RemoteError> {
        unreachable!("core config must not call snapd")
    }

    fn list(&self, _names: &[String]) -> Result<Vec<Snap>, RemoteError> {
        unreachable!("core config must not call snapd")
    }

    fn find(&self, _options: &FindOptions) -> Result<(Vec<Snap>, ResultInfo), RemoteError> {
        unreachable!("core config must not call snapd")
    }

    fn install(&self, _name: &str, _options: &SnapOptions) -> Result<String, RemoteError> {
        unreachable!("core config must not call snapd")
    }

    fn remove(&self, _name: &str, _options: &SnapOptions) -> Result<String, RemoteError> {
        unreachable!("core config must not call snapd")
    }

    fn server_version(&self) -> Result<ServerVersion, RemoteError> {
        unreachable!("core config must not call snapd")
    }
}

fn write_conf(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("timesyncd.conf");
    fs::write(&path, content).expect("write timesyncd.conf");
    path
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a subscriber that records log output; return the output.
fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let value = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8(buffer.0.lock().expect("lock").clone()).expect("utf8");
    (value, logs)
}

#[test]
fn first_ntp_server_is_used() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_conf(&dir, "[Time]\nNTP=pool.ntp.org backup.ntp.org\n");

    let adapter = SnapdAdapter::new(Offline, &path);
    assert_eq!(adapter.core_config(&[]).ntp_server, "pool.ntp.org");
}

#[test]
fn snapshot_always_has_four_fields() {
    let dir = TempDir::new().expect("tempdir");
    let present = write_conf(&dir, "[Time]\nNTP=time.example.org\n");
    let absent = dir.path().join("missing.conf");

    for path in [present.as_path(), absent.as_path()] {
        let adapter = SnapdAdapter::new(Offline, path);
        for keys in [vec![], vec!["Timezone".to_string()], vec!["bogus".to_string()]] {
            let value = serde_json::to_value(adapter.core_config(&keys)).expect("serialize");
            let object = value.as_object().expect("object");
            let mut fields: Vec<_> = object.keys().map(String::as_str).collect();
            fields.sort_unstable();
            assert_eq!(fields, vec!["Date", "NTPServer", "Time", "Timezone"]);
            assert!(object["Timezone"].is_number());
        }
    }
}

#[test]
fn absent_file_logs_and_yields_empty_server() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("timesyncd.conf");

    let (server, logs) = capture_logs(|| read_ntp_server(&path));

    assert_eq!(server, "");
    assert!(logs.contains("WARN"), "logs: {logs}");
    assert!(logs.contains("unable to read"), "logs: {logs}");
}

#[test]
fn missing_key_logs_and_yields_empty_server() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_conf(&dir, "[Time]\nFallbackNTP=ntp.ubuntu.com\n");

    let (server, logs) = capture_logs(|| read_ntp_server(&path));

    assert_eq!(server, "");
    assert!(logs.contains("no NTP servers are set"), "logs: {logs}");
}

#[test]
fn empty_value_and_wrong_section_yield_empty_server() {
    let dir = TempDir::new().expect("tempdir");

    let empty = write_conf(&dir, "[Time]\nNTP=\n");
    assert_eq!(read_ntp_server(&empty), "");

    let other_section = write_conf(&dir, "[Network]\nNTP=pool.ntp.org\n");
    assert_eq!(read_ntp_server(&other_section), "");
}

#[test]
fn directory_in_place_of_file_is_tolerated() {
    let dir = TempDir::new().expect("tempdir");
    assert_eq!(read_ntp_server(Path::new(dir.path())), "");
}
