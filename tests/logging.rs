use std::{fs, path::Path, thread::sleep, time::Duration};

use sectioned_dashboard::dashboard::{LayoutContext, Module, SnapshotEngine};
use serial_test::serial;
use tempfile::tempdir;

fn log_with(debug: bool, path: &Path) -> String {
    let subscriber = sectioned_dashboard::logging::subscriber(debug, Some(path.to_path_buf()));
    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("info-line");
        tracing::warn!("warn-line");
    });
    sleep(Duration::from_millis(100));
    fs::read_to_string(path).unwrap_or_default()
}

#[test]
#[serial]
fn writes_log_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("log.txt");

    let contents = log_with(false, &path);

    assert!(path.exists(), "log file was not created");
    assert!(contents.contains("info-line"));
    assert!(contents.contains("warn-line"));
}

#[test]
#[serial]
fn debug_mode_honours_rust_log() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("log.txt");

    std::env::set_var("RUST_LOG", "warn");
    let contents = log_with(true, &path);
    std::env::remove_var("RUST_LOG");

    assert!(!contents.contains("info-line"));
    assert!(contents.contains("warn-line"));
}

#[test]
#[serial]
fn rust_log_ignored_without_debug() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("log.txt");

    std::env::set_var("RUST_LOG", "warn");
    let contents = log_with(false, &path);
    std::env::remove_var("RUST_LOG");

    assert!(contents.contains("info-line"));
}

#[test]
#[serial]
fn init_routes_engine_events_to_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dashboard.log");

    sectioned_dashboard::logging::init(false, Some(path.clone()));
    let mut engine = SnapshotEngine::default();
    engine.apply(
        vec![Module::greeting("a"), Module::greeting("b")],
        LayoutContext::compact(),
    );

    sleep(Duration::from_millis(100));

    let contents = fs::read_to_string(path).unwrap();
    assert!(contents.contains("duplicate module greeting"));
}
