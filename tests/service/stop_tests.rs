// Tests for explicit cancellation

use std::fs;
use std::thread;
use std::time::{Duration, Instant};

use dirhash::{ErrorKind, HashService, OperationId};

fn wait_until_finished(service: &HashService, id: OperationId) {
    let deadline = Instant::now() + Duration::from_secs(30);
    while service.query_status(id).unwrap() {
        assert!(Instant::now() < deadline, "scan did not finish in time");
        thread::sleep(Duration::from_millis(2));
    }
}

#[test]
fn test_stop_unknown_id_reports_argument_invalid() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"a").unwrap();

    // Issue an id on one handle, stop it on another that never saw it
    let other = HashService::new();
    other.init().unwrap();
    let foreign = other.start_directory_scan(dir.path()).unwrap();
    wait_until_finished(&other, foreign);
    other.terminate().unwrap();

    let service = HashService::new();
    service.init().unwrap();

    let err = service.stop(foreign).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArgumentInvalid);

    service.terminate().unwrap();
}

#[test]
fn test_stop_finished_operation_reports_argument_invalid() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"a").unwrap();

    let service = HashService::new();
    service.init().unwrap();
    let id = service.start_directory_scan(dir.path()).unwrap();
    wait_until_finished(&service, id);

    let err = service.stop(id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArgumentInvalid);

    service.terminate().unwrap();
}

#[test]
fn test_exactly_one_stop_wins() {
    // Enough files that the worker is still busy when stop arrives
    let dir = tempfile::tempdir().unwrap();
    for i in 0..2000 {
        fs::write(dir.path().join(format!("file_{:05}.dat", i)), b"payload").unwrap();
    }

    let service = HashService::new();
    service.init().unwrap();
    let id = service.start_directory_scan(dir.path()).unwrap();

    // The first stop finds the operation running and wins
    assert!(service.stop(id).is_ok());
    // Every subsequent stop on that id loses, running worker or not
    assert_eq!(service.stop(id).unwrap_err().kind(), ErrorKind::ArgumentInvalid);

    wait_until_finished(&service, id);
    assert_eq!(service.stop(id).unwrap_err().kind(), ErrorKind::ArgumentInvalid);

    // Cancellation is honored at a file boundary: the scan must not have
    // processed the whole directory.
    let mut drained = 0usize;
    while service.drain_next().is_ok() {
        drained += 1;
    }
    assert!(drained < 2000, "cancelled scan hashed every file");

    service.terminate().unwrap();
}

#[test]
fn test_stop_then_terminate() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..500 {
        fs::write(dir.path().join(format!("f{}.txt", i)), b"x").unwrap();
    }

    let service = HashService::new();
    service.init().unwrap();
    let id = service.start_directory_scan(dir.path()).unwrap();

    let _ = service.stop(id);
    assert!(service.terminate().is_ok());
}
