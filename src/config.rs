// Service configuration
// Builder-style knobs applied when the service handle is created

use std::time::Duration;

use crate::digest::DigestAlgorithm;

/// Configuration for a [`HashService`](crate::HashService) handle.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Digest algorithm applied to every scanned file.
    pub algorithm: DigestAlgorithm,
    /// Read buffer size for streaming file digests.
    pub read_buffer_size: usize,
    /// Upper bound terminate() waits for running workers to observe
    /// cancellation before releasing shared state.
    pub terminate_timeout: Duration,
}

impl ServiceConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self {
            algorithm: DigestAlgorithm::Md5,
            read_buffer_size: 1024 * 1024,
            terminate_timeout: Duration::from_secs(5),
        }
    }

    /// Set the digest algorithm
    pub fn with_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the read buffer size used for streaming digests
    pub fn with_read_buffer_size(mut self, read_buffer_size: usize) -> Self {
        self.read_buffer_size = read_buffer_size.max(1);
        self
    }

    /// Set the bound on how long terminate() waits for workers
    pub fn with_terminate_timeout(mut self, terminate_timeout: Duration) -> Self {
        self.terminate_timeout = terminate_timeout;
        self
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new()
    }
}
