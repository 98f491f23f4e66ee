// Library module for dirhash
// Asynchronous directory-hashing service: lifecycle-gated background scans
// with non-blocking status polling and a pull-based result log

pub mod config;
pub mod digest;
pub mod error;
pub mod service;

// Re-export commonly used types for convenience
pub use config::ServiceConfig;
pub use digest::{DigestAlgorithm, FileDigester, Hasher};
pub use error::{ErrorKind, ServiceError};
pub use service::{HashService, OperationId, ResultRecord};
