//! Pipeline execution implementation.

use crate::core::crawler::{CrawlConfig, FileCrawler, WalkDirCrawler};
use crate::core::hasher::{ChecksumAlgorithmKind, HasherConfig};
use crate::core::queue::TaskQueue;
use crate::core::stop::{stop_pair, StopHandle, StopToken};
use crate::core::worker::{HashResult, HashWorker, WorkerStats};
use crate::error::{DirHashError, ScanError};
use crate::events::{
    null_sender, Event, EventSender, HashEvent, PipelineEvent, PipelinePhase, PipelineSummary,
};
use crossbeam_channel::unbounded;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default number of hashing workers
pub const DEFAULT_WORKER_COUNT: usize = 10;

/// Default task queue capacity
pub const DEFAULT_QUEUE_CAPACITY: usize = 128;

/// Result of a pipeline run
#[derive(Debug)]
pub struct PipelineReport {
    /// Regular files discovered by the crawler
    pub files_discovered: usize,
    /// Files successfully hashed
    pub files_hashed: usize,
    /// Files that could not be hashed
    pub files_failed: usize,
    /// Total bytes hashed
    pub bytes_hashed: u64,
    /// Subtrees or entries the crawler could not read
    pub walk_errors: usize,
    /// Wall-clock duration of the crawl phase
    pub crawl_duration: Duration,
    /// Wall-clock duration of the hash phase
    pub hash_duration: Duration,
    /// Whether the run was cut short by the stop signal
    pub interrupted: bool,
    /// One result per task taken from the queue
    pub results: Vec<HashResult>,
}

impl PipelineReport {
    /// Condense the report into its serializable summary
    pub fn summary(&self) -> PipelineSummary {
        PipelineSummary {
            files_discovered: self.files_discovered,
            files_hashed: self.files_hashed,
            files_failed: self.files_failed,
            bytes_hashed: self.bytes_hashed,
            crawl_duration_ms: self.crawl_duration.as_millis() as u64,
            hash_duration_ms: self.hash_duration.as_millis() as u64,
        }
    }
}

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root directory to scan
    pub root: PathBuf,
    /// Number of hashing workers
    pub workers: usize,
    /// Task queue capacity (backpressure bound)
    pub queue_capacity: usize,
    /// Checksum algorithm to use
    pub algorithm: ChecksumAlgorithmKind,
    /// Crawler configuration
    pub crawl: CrawlConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            workers: DEFAULT_WORKER_COUNT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            algorithm: ChecksumAlgorithmKind::Blake3,
            crawl: CrawlConfig::default(),
        }
    }
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
    crawler: Option<Box<dyn FileCrawler>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            crawler: None,
        }
    }

    /// Set the root directory to scan
    pub fn root(mut self, root: PathBuf) -> Self {
        self.config.root = root;
        self
    }

    /// Set the number of hashing workers
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers.max(1);
        self
    }

    /// Set the task queue capacity
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity.max(1);
        self
    }

    /// Set the checksum algorithm
    pub fn algorithm(mut self, algorithm: ChecksumAlgorithmKind) -> Self {
        self.config.algorithm = algorithm;
        self
    }

    /// Follow symbolic links during the crawl
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.config.crawl.follow_symlinks = follow;
        self
    }

    /// Limit crawl depth
    pub fn max_depth(mut self, depth: Option<usize>) -> Self {
        self.config.crawl.max_depth = depth;
        self
    }

    /// Substitute the crawler implementation (testing seam)
    pub fn crawler(mut self, crawler: Box<dyn FileCrawler>) -> Self {
        self.crawler = Some(crawler);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        let crawl = self.config.crawl.clone();
        let (stop_handle, stop) = stop_pair();
        Pipeline {
            config: self.config,
            crawler: self
                .crawler
                .unwrap_or_else(|| Box::new(WalkDirCrawler::new(crawl))),
            stop_handle,
            stop,
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The crawl/hash pipeline coordinator.
///
/// Owns the lifecycle: validates the root, starts one crawler and a
/// fixed pool of workers, waits for the crawler's finished signal, lets
/// the workers drain the queue, then aggregates every result.
pub struct Pipeline {
    config: PipelineConfig,
    crawler: Box<dyn FileCrawler>,
    stop_handle: StopHandle,
    stop: StopToken,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Get a clone of the stop handle (for signal handlers).
    ///
    /// Firing it wakes the crawler and every worker, even those blocked
    /// on an empty queue, and the run winds down with `interrupted` set.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop_handle.clone()
    }

    /// Run the pipeline without events
    pub fn run(self) -> Result<PipelineReport, DirHashError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting
    pub fn run_with_events(self, events: &EventSender) -> Result<PipelineReport, DirHashError> {
        let Pipeline {
            config,
            crawler,
            stop_handle: _stop_handle,
            stop,
        } = self;

        // Fail fast before any component starts
        let root = validate_root(&config.root)?;

        info!(
            root = %root.display(),
            workers = config.workers,
            algorithm = %config.algorithm,
            "Starting pipeline"
        );

        events.send(Event::Pipeline(PipelineEvent::Started));
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Crawling,
        }));

        let (task_tx, task_rx) = TaskQueue::bounded(config.queue_capacity);
        let (result_tx, result_rx) = unbounded::<HashResult>();
        let hasher: Arc<dyn crate::core::hasher::ChecksumAlgorithm> =
            Arc::from(HasherConfig::new().algorithm(config.algorithm).build());

        let hash_start = Instant::now();

        // One crawler; it owns the only task sender, so its exit is the
        // channel's disconnect
        let crawler_root = root.clone();
        let crawler_stop = stop.clone();
        let crawler_events = events.clone();
        let crawler_handle = thread::Builder::new()
            .name("crawler".to_string())
            .spawn(move || crawler.crawl(&crawler_root, task_tx, &crawler_stop, &crawler_events))
            .map_err(|e| DirHashError::Config(format!("failed to spawn crawler: {e}")))?;

        events.send(Event::Hash(HashEvent::Started {
            workers: config.workers,
        }));

        let mut workers = Vec::with_capacity(config.workers);
        for id in 0..config.workers {
            let worker = HashWorker::spawn(
                id,
                Arc::clone(&hasher),
                task_rx.clone(),
                result_tx.clone(),
                stop.clone(),
                events.clone(),
            )
            .map_err(|e| DirHashError::Config(format!("failed to spawn worker {id}: {e}")))?;
            workers.push(worker);
        }

        // The coordinator keeps no endpoints of its own: results.iter()
        // below must end exactly when the last worker exits
        drop(task_rx);
        drop(result_tx);

        // Explicit finished signal - a one-shot join, not a poll loop
        let crawl_stats = crawler_handle
            .join()
            .map_err(|_| DirHashError::Config("crawler thread panicked".to_string()))?
            .map_err(DirHashError::from)?;

        debug!(
            files = crawl_stats.files_found,
            dirs = crawl_stats.dirs_visited,
            errors = crawl_stats.walk_errors,
            "Crawl finished, draining queue"
        );
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Draining,
        }));

        // Workers observe the disconnect only once the queue is empty,
        // so collecting until the channel closes is the completion wait
        let results: Vec<HashResult> = result_rx.iter().collect();

        let stats: WorkerStats = workers
            .into_iter()
            .map(HashWorker::join)
            .fold(WorkerStats::default(), |mut acc, s| {
                acc.hashed += s.hashed;
                acc.failed += s.failed;
                acc.bytes_hashed += s.bytes_hashed;
                acc
            });

        let hash_duration = hash_start.elapsed();
        let interrupted = crawl_stats.interrupted || stop.is_stopped();

        events.send(Event::Hash(HashEvent::Completed {
            hashed: stats.hashed,
            failed: stats.failed,
        }));

        let report = PipelineReport {
            files_discovered: crawl_stats.files_found,
            files_hashed: stats.hashed,
            files_failed: stats.failed,
            bytes_hashed: stats.bytes_hashed,
            walk_errors: crawl_stats.walk_errors,
            crawl_duration: crawl_stats.duration,
            hash_duration,
            interrupted,
            results,
        };

        if interrupted {
            events.send(Event::Pipeline(PipelineEvent::Cancelled));
        } else {
            // Every discovered task was consumed and answered
            debug_assert_eq!(
                report.files_discovered,
                report.files_hashed + report.files_failed
            );
            events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
                phase: PipelinePhase::Terminated,
            }));
        }

        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: report.summary(),
        }));

        info!(
            discovered = report.files_discovered,
            hashed = report.files_hashed,
            failed = report.files_failed,
            interrupted = report.interrupted,
            "Pipeline finished"
        );

        Ok(report)
    }
}

/// Check the root before any thread is spawned.
fn validate_root(root: &PathBuf) -> Result<PathBuf, ScanError> {
    if !root.exists() {
        return Err(ScanError::RootNotFound { path: root.clone() });
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory { path: root.clone() });
    }
    root.canonicalize().map_err(|source| ScanError::ReadDirectory {
        path: root.clone(),
        source,
    })
}
