// Centralized error handling module
// Every service call resolves to one of the shared outcome kinds

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::service::OperationId;

/// Outcome codes shared by every service call.
///
/// Success is expressed at the `Result` level, so there is no `Ok` variant
/// here. `Exception` and `Memory` cannot be raised by safe in-process code;
/// they stay in the enumeration for callers that map outcomes onto a wire
/// protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unspecified internal failure.
    General,
    /// An invalid call shape reached the boundary.
    Exception,
    /// Allocation failure.
    Memory,
    /// No result record is currently available to drain.
    LogEmpty,
    /// A supplied argument is well-formed but semantically wrong.
    ArgumentInvalid,
    /// A required argument was omitted entirely.
    ArgumentNull,
    /// Operation-scoped call issued while the service is not initialized.
    NotInitialized,
    /// Init called while the service is already initialized.
    AlreadyInitialized,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ErrorKind::General => "general",
            ErrorKind::Exception => "exception",
            ErrorKind::Memory => "memory",
            ErrorKind::LogEmpty => "log empty",
            ErrorKind::ArgumentInvalid => "argument invalid",
            ErrorKind::ArgumentNull => "argument null",
            ErrorKind::NotInitialized => "not initialized",
            ErrorKind::AlreadyInitialized => "already initialized",
        };
        write!(f, "{}", name)
    }
}

/// Main error type for the hashing service
/// Provides context-rich messages; `kind()` maps each variant onto the
/// shared outcome code.
#[derive(Debug)]
pub enum ServiceError {
    /// Operation-scoped call while the service is not initialized.
    NotInitialized,

    /// Init called on an already-initialized service.
    AlreadyInitialized,

    /// Drain called with no pending record.
    LogEmpty,

    /// The supplied target path was empty.
    EmptyPath,

    /// The supplied target path does not exist.
    DirectoryNotFound { path: PathBuf },

    /// The supplied target path exists but is not a directory.
    NotADirectory { path: PathBuf },

    /// Stop issued for an operation that is not running.
    OperationNotRunning { id: OperationId },

    /// Internal failure with context about the operation that hit it.
    Internal { operation: String, source: io::Error },
}

impl ServiceError {
    /// The shared outcome code for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::NotInitialized => ErrorKind::NotInitialized,
            ServiceError::AlreadyInitialized => ErrorKind::AlreadyInitialized,
            ServiceError::LogEmpty => ErrorKind::LogEmpty,
            ServiceError::EmptyPath => ErrorKind::ArgumentNull,
            ServiceError::DirectoryNotFound { .. } => ErrorKind::ArgumentInvalid,
            ServiceError::NotADirectory { .. } => ErrorKind::ArgumentInvalid,
            ServiceError::OperationNotRunning { .. } => ErrorKind::ArgumentInvalid,
            ServiceError::Internal { .. } => ErrorKind::General,
        }
    }

    /// Create an Internal error with context about the failed operation.
    pub fn from_io_error(err: io::Error, operation: &str) -> Self {
        ServiceError::Internal {
            operation: operation.to_string(),
            source: err,
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ServiceError::NotInitialized => {
                write!(f, "Service is not initialized")
            }
            ServiceError::AlreadyInitialized => {
                write!(f, "Service is already initialized")
            }
            ServiceError::LogEmpty => {
                write!(f, "Result log has no pending record")
            }
            ServiceError::EmptyPath => {
                write!(f, "Target path is empty")
            }
            ServiceError::DirectoryNotFound { path } => {
                write!(f, "Directory not found: {}", path.display())
            }
            ServiceError::NotADirectory { path } => {
                write!(f, "Not a directory: {}", path.display())
            }
            ServiceError::OperationNotRunning { id } => {
                write!(f, "Operation {} is not running", id)
            }
            ServiceError::Internal { operation, source } => {
                write!(f, "Internal error while {}: {}", operation, source)
            }
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Internal { source, .. } => Some(source),
            _ => None,
        }
    }
}
