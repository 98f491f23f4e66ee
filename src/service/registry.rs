// Operation registry
// Tracks every scan operation issued within one service lifecycle by id

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::ServiceError;

/// Opaque identifier for one directory-scan operation.
///
/// Ids are unique for the lifetime of the service instance that issued them
/// and are never reused, so a finished operation can never be confused with
/// a newly started one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationId(u64);

impl OperationId {
    pub(crate) fn from_raw(raw: u64) -> Self {
        OperationId(raw)
    }

    /// The raw numeric value of this id.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-operation bookkeeping.
///
/// Mutated only under the registry lock; the `cancelled` flag is shared
/// with the operation's worker so stop requests reach it without the lock.
struct OperationState {
    target_path: PathBuf,
    running: bool,
    cancelled: Arc<AtomicBool>,
    started_at: Instant,
}

/// Registry of in-flight and completed operations.
///
/// Finished operations stay resolvable: a status query or stop on an old id
/// yields a defined answer instead of an unknown-id failure.
pub struct OperationRegistry {
    inner: Mutex<RegistryInner>,
}

struct RegistryInner {
    next_id: u64,
    operations: HashMap<OperationId, OperationState>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryInner {
                next_id: 1,
                operations: HashMap::new(),
            }),
        }
    }

    /// Allocate a fresh id and record a running operation for `target_path`.
    ///
    /// Returns the id together with the cancellation flag the worker must
    /// watch.
    pub fn register(&self, target_path: PathBuf) -> (OperationId, Arc<AtomicBool>) {
        let mut inner = self.lock();
        let id = OperationId::from_raw(inner.next_id);
        inner.next_id += 1;

        let cancelled = Arc::new(AtomicBool::new(false));
        inner.operations.insert(
            id,
            OperationState {
                target_path,
                running: true,
                cancelled: Arc::clone(&cancelled),
                started_at: Instant::now(),
            },
        );

        (id, cancelled)
    }

    /// Whether the operation is still running.
    ///
    /// Unknown ids report not-running: externally the only significant fact
    /// is whether further polling is needed.
    pub fn is_running(&self, id: OperationId) -> bool {
        let inner = self.lock();
        inner.operations.get(&id).map(|op| op.running).unwrap_or(false)
    }

    /// Request cancellation of a running operation.
    ///
    /// Exactly one stop wins per operation: the first call that finds it
    /// running and not yet cancelled sets the flag; any other call fails
    /// with an invalid-argument outcome.
    pub fn request_stop(&self, id: OperationId) -> Result<(), ServiceError> {
        let inner = self.lock();
        match inner.operations.get(&id) {
            Some(op) if op.running => {
                if op.cancelled.swap(true, Ordering::SeqCst) {
                    // A stop already won while the worker is still draining
                    return Err(ServiceError::OperationNotRunning { id });
                }
                debug!(op = %id, path = %op.target_path.display(), "stop requested");
                Ok(())
            }
            _ => Err(ServiceError::OperationNotRunning { id }),
        }
    }

    /// Mark an operation as finished and return its elapsed runtime.
    ///
    /// Called by the worker exactly once; a second call (or an unknown id)
    /// is a no-op returning None.
    pub fn mark_finished(&self, id: OperationId) -> Option<Duration> {
        let mut inner = self.lock();
        match inner.operations.get_mut(&id) {
            Some(op) if op.running => {
                op.running = false;
                Some(op.started_at.elapsed())
            }
            _ => None,
        }
    }

    /// Signal cancellation to every still-running operation.
    ///
    /// Returns how many operations were signalled.
    pub fn cancel_all(&self) -> usize {
        let inner = self.lock();
        let mut signalled = 0;
        for op in inner.operations.values() {
            if op.running && !op.cancelled.swap(true, Ordering::SeqCst) {
                signalled += 1;
            }
        }
        signalled
    }

    /// Number of operations still running.
    pub fn active_count(&self) -> usize {
        let inner = self.lock();
        inner.operations.values().filter(|op| op.running).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RegistryInner> {
        // A worker holding this lock cannot panic while it does, so a
        // poisoned mutex only ever means a panicking test; recover the data.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
