// Tests for the error taxonomy surfaced by the service calls

use std::error::Error;
use std::fs;

use dirhash::{ErrorKind, HashService, ServiceError};

#[test]
fn test_lifecycle_errors_map_to_their_kinds() {
    let service = HashService::new();
    assert_eq!(
        service.terminate().unwrap_err().kind(),
        ErrorKind::NotInitialized
    );

    service.init().unwrap();
    assert_eq!(
        service.init().unwrap_err().kind(),
        ErrorKind::AlreadyInitialized
    );
    service.terminate().unwrap();
}

#[test]
fn test_argument_errors_map_to_their_kinds() {
    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("plain.txt");
    fs::write(&file_path, b"file").unwrap();

    let service = HashService::new();
    service.init().unwrap();

    assert_eq!(
        service.start_directory_scan("").unwrap_err().kind(),
        ErrorKind::ArgumentNull
    );
    assert_eq!(
        service.start_directory_scan("./gone_directory").unwrap_err().kind(),
        ErrorKind::ArgumentInvalid
    );
    assert_eq!(
        service.start_directory_scan(&file_path).unwrap_err().kind(),
        ErrorKind::ArgumentInvalid
    );
    assert_eq!(service.drain_next().unwrap_err().kind(), ErrorKind::LogEmpty);

    service.terminate().unwrap();
}

#[test]
fn test_display_carries_context() {
    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("plain.txt");
    fs::write(&file_path, b"file").unwrap();

    let service = HashService::new();
    service.init().unwrap();

    let err = service.start_directory_scan(&file_path).unwrap_err();
    assert!(err.to_string().contains("plain.txt"));

    let err = service.start_directory_scan("./gone_directory").unwrap_err();
    assert!(err.to_string().contains("gone_directory"));

    service.terminate().unwrap();
}

#[test]
fn test_simple_errors_have_no_source() {
    let service = HashService::new();
    let err = service.terminate().unwrap_err();
    assert!(err.source().is_none());
}

#[test]
fn test_internal_error_keeps_io_source() {
    let io_err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
    let err = ServiceError::from_io_error(io_err, "spawning scan worker");

    assert_eq!(err.kind(), ErrorKind::General);
    assert!(err.source().is_some());
    assert!(err.to_string().contains("spawning scan worker"));
}

#[test]
fn test_kind_display_names() {
    assert_eq!(ErrorKind::LogEmpty.to_string(), "log empty");
    assert_eq!(ErrorKind::ArgumentInvalid.to_string(), "argument invalid");
    assert_eq!(ErrorKind::NotInitialized.to_string(), "not initialized");
}
