//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the checksum pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Crawl phase events
    Crawl(CrawlEvent),
    /// Hashing events
    Hash(HashEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events from the directory crawler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CrawlEvent {
    /// Crawling has started from the given root
    Started { root: PathBuf },
    /// A regular file was discovered and queued for hashing
    FileFound { path: PathBuf },
    /// A subtree or entry could not be read; the crawl continues
    Error { path: PathBuf, message: String },
    /// Crawling completed; no more tasks will be queued
    Completed { files_found: usize },
}

/// Events from the hash workers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HashEvent {
    /// Hashing has started with the given pool size
    Started { workers: usize },
    /// A file was successfully hashed
    FileHashed { path: PathBuf, checksum: String },
    /// A file could not be opened or read; hashing continues
    Error { path: PathBuf, message: String },
    /// All queued work has been consumed
    Completed { hashed: usize, failed: usize },
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new lifecycle phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed
    Completed { summary: PipelineSummary },
    /// Pipeline was cancelled before completion
    Cancelled,
}

/// Lifecycle phases of the pipeline.
///
/// The pipeline only reaches `Terminated` after `Draining` has been
/// observed with an empty task queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    /// Crawler active, workers draining the queue as it fills
    Crawling,
    /// Crawler finished, workers consuming the remaining queued tasks
    Draining,
    /// Queue empty and all workers stopped
    Terminated,
}

/// Summary of a completed pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Regular files discovered by the crawler
    pub files_discovered: usize,
    /// Files successfully hashed
    pub files_hashed: usize,
    /// Files that could not be hashed
    pub files_failed: usize,
    /// Total bytes hashed
    pub bytes_hashed: u64,
    /// Wall-clock duration of the crawl phase in milliseconds
    pub crawl_duration_ms: u64,
    /// Wall-clock duration of the hash phase in milliseconds
    pub hash_duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Crawling => write!(f, "Crawling"),
            PipelinePhase::Draining => write!(f, "Draining"),
            PipelinePhase::Terminated => write!(f, "Terminated"),
        }
    }
}
