//! Bounded task channel connecting the crawler to the worker pool.
//!
//! The channel is the only hand-off point between discovery and hashing.
//! Bounding its capacity gives natural backpressure: when hashing falls
//! behind, the crawler blocks on `send` instead of buffering the whole
//! tree in memory.
//!
//! Termination rides on disconnect semantics: the crawler drops its
//! `TaskSender` when the walk is done, and `TaskReceiver::recv` only
//! starts failing once the queue is also empty. Workers therefore never
//! stop while a task they could have served remains queued.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A unit of work: one regular file to be hashed.
///
/// Created by the crawler, consumed by exactly one worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTask {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes at discovery time
    pub size: u64,
}

impl FileTask {
    /// Create a new task for the given path
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Bounded FIFO queue of pending `FileTask`s.
pub struct TaskQueue;

impl TaskQueue {
    /// Create a bounded task queue with the given capacity.
    pub fn bounded(capacity: usize) -> (TaskSender, TaskReceiver) {
        let (sender, receiver) = bounded(capacity);
        (TaskSender { inner: sender }, TaskReceiver { inner: receiver })
    }
}

/// Producer handle held by the crawler.
///
/// Dropping the last sender is the crawler's *finished* signal.
#[derive(Clone)]
pub struct TaskSender {
    inner: Sender<FileTask>,
}

impl TaskSender {
    /// Queue a task, blocking while the channel is full.
    ///
    /// Returns `Err` only when every receiver is gone, which means the
    /// worker pool has shut down and the task can never be served.
    pub fn send(&self, task: FileTask) -> Result<(), FileTask> {
        self.inner.send(task).map_err(|e| e.into_inner())
    }

    /// Number of tasks currently queued
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the queue is currently empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Consumer handle held by each worker.
#[derive(Clone)]
pub struct TaskReceiver {
    inner: Receiver<FileTask>,
}

impl TaskReceiver {
    /// Receive the next task, blocking while the queue is empty.
    ///
    /// Returns `None` once the crawler has finished (all senders
    /// dropped) and every queued task has been consumed.
    pub fn recv(&self) -> Option<FileTask> {
        self.inner.recv().ok()
    }

    /// Try to receive a task without blocking
    pub fn try_recv(&self) -> Option<FileTask> {
        self.inner.try_recv().ok()
    }

    /// Raw channel endpoint, for use in `select!` alongside the stop
    /// signal.
    pub fn channel(&self) -> &Receiver<FileTask> {
        &self.inner
    }

    /// Number of tasks currently queued
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the queue is currently empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
