//! End-to-end hot reload against the real file system notifier.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use pathvector_core::Registry;
use pathvector_watcher::{
    start_watching, NotifySource, TracingObserver, WatchError, WatcherState,
};
use tempfile::TempDir;

const EUROPE_1234: &str =
    r#"{"eu_AS1234_v4": {"Name":"Europe Link","Tags":["core"],"ASN":1234}}"#;
const EUROPE_9999: &str =
    r#"{"eu_AS1234_v4": {"Name":"Europe Link","Tags":["core"],"ASN":9999}}"#;

/// Waits until the stored (not derived) ASN for `identifier` equals `asn`.
async fn wait_for_stored_asn(registry: &Registry, identifier: &str, asn: i64) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    while tokio::time::Instant::now() < deadline {
        if registry.snapshot().get(identifier).map(|p| p.asn) == Some(asn) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    false
}

fn write_protocols(path: &Path, contents: &str) {
    fs::write(path, contents).expect("write protocols");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn file_write_is_picked_up_by_watcher() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("protocols.json");
    write_protocols(&path, EUROPE_1234);

    let registry = Arc::new(Registry::new());
    let source = NotifySource::new().expect("notify source");
    let handle = start_watching(registry.clone(), &path, source, Arc::new(TracingObserver))
        .await
        .expect("start watching");

    let record = registry.get("eu_AS1234_v4");
    assert_eq!(record.name, "Europe Link IPv4");
    assert_eq!(record.tags, vec!["core".to_string()]);
    assert_eq!(record.asn, 1234);

    write_protocols(&path, EUROPE_9999);
    assert!(
        wait_for_stored_asn(&registry, "eu_AS1234_v4", 9999).await,
        "watcher never observed the rewritten file"
    );
    assert!(registry.generation() >= 2);
    // the AS token in the identifier wins over the stored ASN
    let record = registry.get("eu_AS1234_v4");
    assert_eq!(record.asn, 1234);
    assert_eq!(record.name, "Europe Link IPv4");

    handle.stop().await.expect("stop watcher");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn no_reloads_after_stop() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("protocols.json");
    write_protocols(&path, EUROPE_1234);

    let registry = Arc::new(Registry::new());
    let source = NotifySource::new().expect("notify source");
    let handle = start_watching(registry.clone(), &path, source, Arc::new(TracingObserver))
        .await
        .expect("start watching");
    assert_eq!(handle.state(), WatcherState::Watching);
    handle.stop().await.expect("stop watcher");

    write_protocols(&path, EUROPE_9999);
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(registry.generation(), 1);
    assert_eq!(registry.snapshot()["eu_AS1234_v4"].asn, 1234);
}

#[tokio::test]
async fn watching_a_missing_file_fails_registration() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("absent.json");

    let registry = Arc::new(Registry::new());
    let source = NotifySource::new().expect("notify source");
    let err = start_watching(registry.clone(), &path, source, Arc::new(TracingObserver))
        .await
        .unwrap_err();
    match err {
        WatchError::Io { path: reported, source } => {
            assert_eq!(reported, path);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected I/O error, got: {other}"),
    }
    assert!(!registry.is_loaded());
}
