// Directory-hashing service
// Lifecycle state machine gating the operation registry and result log

pub mod log;
pub mod registry;
mod worker;

pub use log::{ResultLog, ResultRecord};
pub use registry::{OperationId, OperationRegistry};

use std::fs;
use std::mem;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, warn};

use crate::config::ServiceConfig;
use crate::digest::FileDigester;
use crate::error::ServiceError;

use worker::ScanTask;

/// Lifecycle states of a service handle.
///
/// `Terminated` is terminal; there is no transition back.
enum Lifecycle {
    Uninitialized,
    Initialized(Active),
    Terminated,
}

/// State owned by the service while it is initialized.
struct Active {
    registry: Arc<OperationRegistry>,
    log: Arc<ResultLog>,
    done_tx: Sender<OperationId>,
    done_rx: Receiver<OperationId>,
}

/// Handle to one directory-hashing service instance.
///
/// The handle starts uninitialized. After [`init`](Self::init) it accepts
/// scan operations; [`terminate`](Self::terminate) cancels whatever is
/// still running and releases all resident state. Single-instance semantics
/// hold per handle, with no hidden global state.
///
/// `query_status` and `drain_next` never block: callers wait by polling,
/// typically draining once per status poll and continuing to drain after
/// the operation reports finished, since trailing records may land just
/// before completion.
pub struct HashService {
    config: ServiceConfig,
    state: Mutex<Lifecycle>,
}

impl HashService {
    /// Create an uninitialized service handle with default configuration.
    pub fn new() -> Self {
        Self::with_config(ServiceConfig::default())
    }

    /// Create an uninitialized service handle with the given configuration.
    pub fn with_config(config: ServiceConfig) -> Self {
        Self {
            config,
            state: Mutex::new(Lifecycle::Uninitialized),
        }
    }

    /// Initialize the service, allocating the operation registry and the
    /// result log.
    ///
    /// Valid only from the uninitialized state. A terminated handle cannot
    /// be re-initialized.
    pub fn init(&self) -> Result<(), ServiceError> {
        let mut state = self.lock_state();
        match *state {
            Lifecycle::Uninitialized => {
                let (done_tx, done_rx) = crossbeam_channel::unbounded();
                *state = Lifecycle::Initialized(Active {
                    registry: Arc::new(OperationRegistry::new()),
                    log: Arc::new(ResultLog::new()),
                    done_tx,
                    done_rx,
                });
                debug!("service initialized");
                Ok(())
            }
            Lifecycle::Initialized(_) => Err(ServiceError::AlreadyInitialized),
            Lifecycle::Terminated => Err(ServiceError::NotInitialized),
        }
    }

    /// Terminate the service.
    ///
    /// Signals cancellation to every still-running operation and waits,
    /// bounded by the configured terminate timeout, for the workers to
    /// observe it. Workers that outlive the bound keep running detached;
    /// their late appends land in a closed log and are discarded.
    pub fn terminate(&self) -> Result<(), ServiceError> {
        let mut state = self.lock_state();
        match mem::replace(&mut *state, Lifecycle::Terminated) {
            Lifecycle::Initialized(active) => {
                let signalled = active.registry.cancel_all();
                let deadline = Instant::now() + self.config.terminate_timeout;

                while active.registry.active_count() > 0 {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() || active.done_rx.recv_timeout(remaining).is_err() {
                        warn!(
                            still_running = active.registry.active_count(),
                            "terminate timed out waiting for scan workers"
                        );
                        break;
                    }
                }

                active.log.close();
                debug!(signalled, "service terminated");
                Ok(())
            }
            other => {
                *state = other;
                Err(ServiceError::NotInitialized)
            }
        }
    }

    /// Start a background scan of the immediate regular files of `path`.
    ///
    /// Validates the path, records a fresh operation and spawns its worker,
    /// then returns the operation id immediately; the call never blocks on
    /// scan completion.
    pub fn start_directory_scan(&self, path: impl AsRef<Path>) -> Result<OperationId, ServiceError> {
        let path = path.as_ref();
        let state = self.lock_state();
        let active = Self::active(&state)?;

        if path.as_os_str().is_empty() {
            return Err(ServiceError::EmptyPath);
        }
        let metadata = fs::metadata(path).map_err(|_| ServiceError::DirectoryNotFound {
            path: path.to_path_buf(),
        })?;
        if !metadata.is_dir() {
            return Err(ServiceError::NotADirectory {
                path: path.to_path_buf(),
            });
        }

        let (id, cancelled) = active.registry.register(path.to_path_buf());
        let task = ScanTask {
            id,
            target: path.to_path_buf(),
            digester: FileDigester::with_buffer_size(
                self.config.algorithm,
                self.config.read_buffer_size,
            ),
            cancelled,
            registry: Arc::clone(&active.registry),
            log: Arc::clone(&active.log),
            done_tx: active.done_tx.clone(),
        };

        let spawned = thread::Builder::new()
            .name(format!("dirhash-scan-{}", id))
            .spawn(move || worker::run_scan(task));

        match spawned {
            Ok(_) => {
                debug!(op = %id, path = %path.display(), "scan started");
                Ok(id)
            }
            Err(e) => {
                // Roll the operation back so it does not read as running
                // forever without a worker behind it.
                active.registry.mark_finished(id);
                Err(ServiceError::from_io_error(e, "spawning scan worker"))
            }
        }
    }

    /// Whether the operation is still running.
    ///
    /// Never blocks. Finished, stopped and never-issued ids all report
    /// not-running: the only externally significant fact is whether further
    /// polling is needed.
    pub fn query_status(&self, id: OperationId) -> Result<bool, ServiceError> {
        let state = self.lock_state();
        let active = Self::active(&state)?;
        Ok(active.registry.is_running(id))
    }

    /// Request cancellation of a running operation.
    ///
    /// Best-effort and asynchronous: the worker honors the request at its
    /// next file boundary, so a few trailing records may still appear in
    /// the log after this returns. Exactly one stop wins per operation;
    /// any stop that does not find the operation running fails with an
    /// invalid-argument outcome.
    pub fn stop(&self, id: OperationId) -> Result<(), ServiceError> {
        let state = self.lock_state();
        let active = Self::active(&state)?;
        active.registry.request_stop(id)
    }

    /// Remove and return the oldest undrained result record.
    ///
    /// Never blocks. An empty log is not fatal: poll again, and keep
    /// draining after the producing operation reports finished.
    pub fn drain_next(&self) -> Result<ResultRecord, ServiceError> {
        let state = self.lock_state();
        let active = Self::active(&state)?;
        active.log.drain_next().ok_or(ServiceError::LogEmpty)
    }

    fn active<'a>(state: &'a MutexGuard<'_, Lifecycle>) -> Result<&'a Active, ServiceError> {
        match &**state {
            Lifecycle::Initialized(active) => Ok(active),
            _ => Err(ServiceError::NotInitialized),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, Lifecycle> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for HashService {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for HashService {
    fn drop(&mut self) {
        // Best-effort release for handles dropped while initialized: signal
        // the workers and close the log, without the bounded wait.
        let state = self.state.get_mut().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Lifecycle::Initialized(active) = &*state {
            active.registry.cancel_all();
            active.log.close();
        }
    }
}
