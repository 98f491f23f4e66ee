// Result log
// Ordered pull-based queue of per-file digest records

use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;

use tracing::debug;

use super::registry::OperationId;

/// One successfully hashed file.
///
/// Records are immutable after creation and drained exactly once. `Display`
/// renders the wire log line: `<operation_id> <file_name> <digest>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    /// Operation that produced this record.
    pub operation_id: OperationId,
    /// Display name of the file, relative to the scanned directory.
    pub file_name: String,
    /// Hex-encoded content digest of the file's full byte content.
    pub digest: String,
}

impl fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.operation_id, self.file_name, self.digest)
    }
}

/// FIFO queue of result records shared between scan workers and the
/// draining caller.
///
/// The queue is owned and growable; records are appended atomically per
/// worker and stay strictly in per-operation enumeration order. Closing the
/// log (at terminate) discards late appends from workers that outlived the
/// shutdown bound instead of letting them write into released state.
pub struct ResultLog {
    inner: Mutex<LogInner>,
}

struct LogInner {
    records: VecDeque<ResultRecord>,
    closed: bool,
}

impl ResultLog {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(LogInner {
                records: VecDeque::new(),
                closed: false,
            }),
        }
    }

    /// Append a record.
    ///
    /// Returns false when the log has been closed; the caller should stop
    /// producing.
    pub fn append(&self, record: ResultRecord) -> bool {
        let mut inner = self.lock();
        if inner.closed {
            debug!(op = %record.operation_id, file = %record.file_name,
                "record discarded after log close");
            return false;
        }
        inner.records.push_back(record);
        true
    }

    /// Remove and return the oldest undrained record, if any.
    pub fn drain_next(&self) -> Option<ResultRecord> {
        self.lock().records.pop_front()
    }

    /// Number of records currently pending.
    pub fn pending(&self) -> usize {
        self.lock().records.len()
    }

    /// Close the log and drop everything still pending.
    pub fn close(&self) {
        let mut inner = self.lock();
        inner.closed = true;
        inner.records.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LogInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ResultLog {
    fn default() -> Self {
        Self::new()
    }
}
