// Tests for non-blocking status polling

use std::fs;
use std::thread;
use std::time::{Duration, Instant};

use dirhash::{HashService, OperationId};

fn wait_until_finished(service: &HashService, id: OperationId) {
    let deadline = Instant::now() + Duration::from_secs(30);
    while service.query_status(id).unwrap() {
        assert!(Instant::now() < deadline, "scan did not finish in time");
        thread::sleep(Duration::from_millis(2));
    }
}

// An id issued by a different handle is unknown to this one: its registry
// never saw it.
fn foreign_id() -> OperationId {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"a").unwrap();

    let other = HashService::new();
    other.init().unwrap();
    let id = other.start_directory_scan(dir.path()).unwrap();
    wait_until_finished(&other, id);
    other.terminate().unwrap();
    id
}

#[test]
fn test_unknown_id_reports_not_running() {
    let service = HashService::new();
    service.init().unwrap();

    // Unknown ids resolve deterministically: not-running, success. The
    // caller cannot tell "never existed" from "finished", by design.
    assert!(!service.query_status(foreign_id()).unwrap());

    service.terminate().unwrap();
}

#[test]
fn test_finished_operation_reports_not_running() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"a").unwrap();

    let service = HashService::new();
    service.init().unwrap();
    let id = service.start_directory_scan(dir.path()).unwrap();
    wait_until_finished(&service, id);

    assert!(!service.query_status(id).unwrap());

    service.terminate().unwrap();
}

#[test]
fn test_status_never_reverts_to_running() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..20 {
        fs::write(dir.path().join(format!("f{}.txt", i)), b"data").unwrap();
    }

    let service = HashService::new();
    service.init().unwrap();
    let id = service.start_directory_scan(dir.path()).unwrap();
    wait_until_finished(&service, id);

    // running transitioned true -> false exactly once; it must stay false
    for _ in 0..10 {
        assert!(!service.query_status(id).unwrap());
    }

    service.terminate().unwrap();
}
