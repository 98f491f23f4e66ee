// Scan worker
// Background unit of work: enumerate one directory level, hash each
// regular file, append a record per file

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;
use tracing::{debug, warn};

use crate::digest::FileDigester;

use super::log::{ResultLog, ResultRecord};
use super::registry::{OperationId, OperationRegistry};

/// Everything a scan worker needs, moved into its thread at spawn.
pub(crate) struct ScanTask {
    pub id: OperationId,
    pub target: PathBuf,
    pub digester: FileDigester,
    pub cancelled: Arc<AtomicBool>,
    pub registry: Arc<OperationRegistry>,
    pub log: Arc<ResultLog>,
    pub done_tx: Sender<OperationId>,
}

/// Run one scan operation to completion or cancellation.
///
/// Only immediate entries of the target directory are considered, and only
/// regular files among them. Per-file read or hash failures are skipped so
/// the operation still completes with whatever it could process. The
/// running→finished transition at the end is the operation's only
/// completion signal.
pub(crate) fn run_scan(task: ScanTask) {
    let ScanTask {
        id,
        target,
        digester,
        cancelled,
        registry,
        log,
        done_tx,
    } = task;

    let mut hashed = 0usize;
    let mut skipped = 0usize;

    match fs::read_dir(&target) {
        Ok(entries) => {
            for entry_result in entries {
                // Cooperative cancellation boundary: never start another
                // file once a stop or terminate has been observed.
                if cancelled.load(Ordering::Relaxed) {
                    debug!(op = %id, "scan cancelled");
                    break;
                }

                let entry = match entry_result {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!(op = %id, error = %e, "cannot read directory entry");
                        skipped += 1;
                        continue;
                    }
                };

                // Regular files only; subdirectories are not recursed into
                // and symlinks are not followed.
                match entry.file_type() {
                    Ok(file_type) if file_type.is_file() => {}
                    Ok(_) => continue,
                    Err(e) => {
                        warn!(op = %id, error = %e, "cannot read entry file type");
                        skipped += 1;
                        continue;
                    }
                }

                let path = entry.path();
                match digester.digest_file(&path) {
                    Ok(digest) => {
                        let record = ResultRecord {
                            operation_id: id,
                            file_name: entry.file_name().to_string_lossy().into_owned(),
                            digest,
                        };
                        // A closed log means the service is tearing down;
                        // there is nobody left to drain for.
                        if !log.append(record) {
                            break;
                        }
                        hashed += 1;
                    }
                    Err(e) => {
                        warn!(op = %id, path = %path.display(), error = %e,
                            "failed to hash file, skipping");
                        skipped += 1;
                    }
                }
            }
        }
        Err(e) => {
            // The directory vanished or became unreadable; the operation
            // ends early and the poller only ever sees not-running.
            warn!(op = %id, path = %target.display(), error = %e,
                "cannot enumerate directory");
        }
    }

    if let Some(elapsed) = registry.mark_finished(id) {
        debug!(op = %id, hashed, skipped,
            elapsed_ms = elapsed.as_millis() as u64, "scan finished");
    }
    let _ = done_tx.send(id);
}
