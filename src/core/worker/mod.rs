//! # Worker Module
//!
//! The fixed pool of hashing workers.
//!
//! Each worker repeatedly pulls one `FileTask` from the task channel,
//! checksums the file's contents, and emits exactly one `HashResult` -
//! success or failure - on the results channel. A task is never silently
//! dropped: an unreadable file becomes a failure-tagged result the
//! coordinator can count.
//!
//! Workers exit on either of two signals:
//! - the task channel disconnecting, which by construction happens only
//!   after the crawler finished AND the queue is empty
//! - the stop signal, which wakes a worker even while it is blocked
//!   waiting for its next task

use crate::core::hasher::{Checksum, ChecksumAlgorithm};
use crate::core::queue::{FileTask, TaskReceiver};
use crate::core::stop::StopToken;
use crate::error::HashError;
use crate::events::{Event, EventSender, HashEvent};
use crossbeam_channel::{select, Sender};
use serde::Serialize;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::debug;

/// Outcome of hashing one file
#[derive(Debug, Serialize)]
pub enum HashOutcome {
    /// The file was read in full and checksummed
    Hashed {
        checksum: Checksum,
        /// Bytes actually read, which for a file changed mid-scan may
        /// differ from the size recorded at discovery
        bytes: u64,
    },
    /// The file could not be opened or read
    Failed {
        #[serde(serialize_with = "serialize_error")]
        error: HashError,
    },
}

fn serialize_error<S: serde::Serializer>(
    error: &HashError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&error.to_string())
}

/// The result produced for one `FileTask`
#[derive(Debug, Serialize)]
pub struct HashResult {
    /// The task this result answers
    pub task: FileTask,
    /// What happened
    pub outcome: HashOutcome,
}

impl HashResult {
    /// Whether the file was hashed successfully
    pub fn is_hashed(&self) -> bool {
        matches!(self.outcome, HashOutcome::Hashed { .. })
    }
}

/// Per-worker counters, returned when the worker is joined
#[derive(Debug, Default, Clone, Copy)]
pub struct WorkerStats {
    /// Files hashed successfully
    pub hashed: usize,
    /// Files that failed to open or read
    pub failed: usize,
    /// Total bytes hashed
    pub bytes_hashed: u64,
}

/// A spawned hashing worker
pub struct HashWorker {
    id: usize,
    handle: Option<JoinHandle<WorkerStats>>,
}

impl HashWorker {
    /// Spawn a worker thread.
    ///
    /// The worker owns clones of its channel endpoints; the coordinator
    /// injects everything at construction, no ambient state.
    pub fn spawn(
        id: usize,
        hasher: Arc<dyn ChecksumAlgorithm>,
        tasks: TaskReceiver,
        results: Sender<HashResult>,
        stop: StopToken,
        events: EventSender,
    ) -> std::io::Result<Self> {
        let handle = thread::Builder::new()
            .name(format!("hasher-{id}"))
            .spawn(move || worker_loop(id, hasher, tasks, results, stop, events))?;

        Ok(Self {
            id,
            handle: Some(handle),
        })
    }

    /// Get the worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Wait for the worker to finish and collect its counters
    pub fn join(mut self) -> WorkerStats {
        match self.handle.take() {
            Some(handle) => handle.join().unwrap_or_default(),
            None => WorkerStats::default(),
        }
    }
}

fn worker_loop(
    id: usize,
    hasher: Arc<dyn ChecksumAlgorithm>,
    tasks: TaskReceiver,
    results: Sender<HashResult>,
    stop: StopToken,
    events: EventSender,
) -> WorkerStats {
    debug!(worker = id, "Worker starting");
    let mut stats = WorkerStats::default();

    loop {
        select! {
            recv(tasks.channel()) -> msg => {
                let task = match msg {
                    Ok(task) => task,
                    // Crawler finished and the queue is drained
                    Err(_) => break,
                };

                let result = process_task(&*hasher, task, &events);
                match &result.outcome {
                    HashOutcome::Hashed { bytes, .. } => {
                        stats.hashed += 1;
                        stats.bytes_hashed += bytes;
                    }
                    HashOutcome::Failed { .. } => stats.failed += 1,
                }

                if results.send(result).is_err() {
                    // Coordinator gone; nothing left to report to
                    break;
                }
            },
            recv(stop.channel()) -> _ => {
                debug!(worker = id, "Worker stopping on signal");
                break;
            },
        }
    }

    debug!(
        worker = id,
        hashed = stats.hashed,
        failed = stats.failed,
        "Worker finished"
    );
    stats
}

/// Hash one file, turning any I/O failure into a failure-tagged result.
fn process_task(
    hasher: &dyn ChecksumAlgorithm,
    task: FileTask,
    events: &EventSender,
) -> HashResult {
    match hasher.checksum_file(&task.path) {
        Ok((checksum, bytes)) => {
            events.send(Event::Hash(HashEvent::FileHashed {
                path: task.path.clone(),
                checksum: checksum.to_hex(),
            }));
            HashResult {
                task,
                outcome: HashOutcome::Hashed { checksum, bytes },
            }
        }
        Err(error) => {
            debug!(path = %task.path.display(), error = %error, "Hashing failed");
            events.send(Event::Hash(HashEvent::Error {
                path: task.path.clone(),
                message: error.to_string(),
            }));
            HashResult {
                task,
                outcome: HashOutcome::Failed { error },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::{Blake3Hasher, HasherConfig};
    use crate::core::queue::TaskQueue;
    use crate::core::stop::stop_pair;
    use crate::events::null_sender;
    use crossbeam_channel::unbounded;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path
    }

    #[test]
    fn worker_hashes_queued_files() {
        let temp_dir = TempDir::new().unwrap();
        let a = write_file(&temp_dir, "a.bin", b"alpha");
        let b = write_file(&temp_dir, "b.bin", b"beta");

        let (task_tx, task_rx) = TaskQueue::bounded(8);
        let (result_tx, result_rx) = unbounded();
        let (_stop_handle, stop) = stop_pair();

        task_tx.send(FileTask::new(a, 5)).unwrap();
        task_tx.send(FileTask::new(b, 4)).unwrap();
        drop(task_tx);

        let worker = HashWorker::spawn(
            0,
            Arc::from(HasherConfig::new().build()),
            task_rx,
            result_tx,
            stop,
            null_sender(),
        )
        .unwrap();

        let stats = worker.join();
        assert_eq!(stats.hashed, 2);
        assert_eq!(stats.failed, 0);
        assert_eq!(stats.bytes_hashed, 9);

        let results: Vec<HashResult> = result_rx.iter().collect();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.is_hashed()));
    }

    #[test]
    fn missing_file_yields_failed_result_not_a_crash() {
        let (task_tx, task_rx) = TaskQueue::bounded(8);
        let (result_tx, result_rx) = unbounded();
        let (_stop_handle, stop) = stop_pair();

        task_tx
            .send(FileTask::new(PathBuf::from("/no/such/file.bin"), 0))
            .unwrap();
        drop(task_tx);

        let worker = HashWorker::spawn(
            0,
            Arc::new(Blake3Hasher::new()),
            task_rx,
            result_tx,
            stop,
            null_sender(),
        )
        .unwrap();

        let stats = worker.join();
        assert_eq!(stats.hashed, 0);
        assert_eq!(stats.failed, 1);

        let results: Vec<HashResult> = result_rx.iter().collect();
        assert_eq!(results.len(), 1);
        assert!(!results[0].is_hashed());
    }

    #[test]
    fn every_task_taken_yields_a_result() {
        let temp_dir = TempDir::new().unwrap();
        let good = write_file(&temp_dir, "good.bin", b"data");

        let (task_tx, task_rx) = TaskQueue::bounded(8);
        let (result_tx, result_rx) = unbounded();
        let (_stop_handle, stop) = stop_pair();

        task_tx.send(FileTask::new(good, 4)).unwrap();
        task_tx
            .send(FileTask::new(PathBuf::from("/no/such/file.bin"), 0))
            .unwrap();
        drop(task_tx);

        let worker = HashWorker::spawn(
            0,
            Arc::new(Blake3Hasher::new()),
            task_rx,
            result_tx,
            stop,
            null_sender(),
        )
        .unwrap();
        worker.join();

        let results: Vec<HashResult> = result_rx.iter().collect();
        assert_eq!(results.len(), 2);
        assert_eq!(results.iter().filter(|r| r.is_hashed()).count(), 1);
    }

    #[test]
    fn blocked_worker_wakes_on_stop_signal() {
        // Keep the task sender alive so the channel never disconnects;
        // the only way the worker can exit is the stop signal.
        let (task_tx, task_rx) = TaskQueue::bounded(8);
        let (result_tx, _result_rx) = unbounded();
        let (stop_handle, stop) = stop_pair();

        let worker = HashWorker::spawn(
            0,
            Arc::new(Blake3Hasher::new()),
            task_rx,
            result_tx,
            stop,
            null_sender(),
        )
        .unwrap();

        stop_handle.stop();

        // Joins promptly only if the blocked recv woke on the signal
        let stats = worker.join();
        assert_eq!(stats.hashed, 0);
        drop(task_tx);
    }
}
