//! # Crawler Module
//!
//! Walks a directory tree depth-first and queues every regular file it
//! finds for hashing.
//!
//! The crawler is a producer: it pushes `FileTask`s onto the bounded
//! task channel and blocks when the channel is full, so a slow worker
//! pool throttles discovery instead of discovery flooding memory.
//! Symlinks and other non-regular entries are skipped; a subtree that
//! cannot be listed is reported and skipped, never fatal to the crawl.

use crate::error::ScanError;
use crate::events::{CrawlEvent, Event, EventSender};
use crate::core::queue::{FileTask, TaskSender};
use crate::core::stop::StopToken;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Configuration for the directory crawler
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            max_depth: None,
        }
    }
}

/// Statistics from a completed crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlStats {
    /// Regular files discovered and queued
    pub files_found: usize,
    /// Directories visited
    pub dirs_visited: usize,
    /// Entries or subtrees that could not be read
    pub walk_errors: usize,
    /// Whether the crawl was cut short by the stop signal
    pub interrupted: bool,
    /// Wall-clock duration of the crawl
    #[serde(skip)]
    pub duration: Duration,
}

/// Trait for file crawlers
///
/// Implement this trait to substitute discovery in tests.
pub trait FileCrawler: Send + Sync {
    /// Walk the tree under `root`, queueing one task per regular file.
    ///
    /// The crawler owns the only `TaskSender`; returning from this
    /// method drops it, which is the observable *finished* signal the
    /// rest of the pipeline keys off. Root validation is the caller's
    /// job - by the time this runs the root is known to exist.
    fn crawl(
        &self,
        root: &Path,
        tasks: TaskSender,
        stop: &StopToken,
        events: &EventSender,
    ) -> Result<CrawlStats, ScanError>;
}

/// Crawler implementation using the walkdir crate
pub struct WalkDirCrawler {
    config: CrawlConfig,
}

impl WalkDirCrawler {
    /// Create a new crawler with the given configuration
    pub fn new(config: CrawlConfig) -> Self {
        Self { config }
    }
}

impl FileCrawler for WalkDirCrawler {
    fn crawl(
        &self,
        root: &Path,
        tasks: TaskSender,
        stop: &StopToken,
        events: &EventSender,
    ) -> Result<CrawlStats, ScanError> {
        let start = Instant::now();
        let mut stats = CrawlStats {
            files_found: 0,
            dirs_visited: 0,
            walk_errors: 0,
            interrupted: false,
            duration: Duration::ZERO,
        };

        events.send(Event::Crawl(CrawlEvent::Started {
            root: root.to_path_buf(),
        }));

        let mut walker = WalkDir::new(root).follow_links(self.config.follow_symlinks);
        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        for entry_result in walker {
            if stop.is_stopped() {
                debug!(root = %root.display(), "Crawl cancelled");
                stats.interrupted = true;
                break;
            }

            match entry_result {
                Ok(entry) => {
                    let file_type = entry.file_type();

                    if file_type.is_dir() {
                        stats.dirs_visited += 1;
                        continue;
                    }

                    // Symlinks, sockets, devices: not hashable content
                    if !file_type.is_file() {
                        continue;
                    }

                    let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
                    let task = FileTask::new(entry.path().to_path_buf(), size);

                    events.send(Event::Crawl(CrawlEvent::FileFound {
                        path: task.path.clone(),
                    }));

                    // Blocks while the queue is full (backpressure). An
                    // Err here means the worker pool is gone; nothing
                    // more we queue could ever be served.
                    if tasks.send(task).is_err() {
                        warn!("Task queue closed before crawl finished");
                        stats.interrupted = true;
                        break;
                    }
                    stats.files_found += 1;
                }
                Err(e) => {
                    // One unreadable subtree never aborts the crawl
                    stats.walk_errors += 1;
                    let path = e
                        .path()
                        .map(|p| p.to_path_buf())
                        .unwrap_or_else(|| root.to_path_buf());

                    // Distinguish permission problems from other listing
                    // failures
                    let error = if e.io_error().map(|e| e.kind())
                        == Some(std::io::ErrorKind::PermissionDenied)
                    {
                        ScanError::PermissionDenied { path: path.clone() }
                    } else {
                        ScanError::ReadDirectory {
                            path: path.clone(),
                            source: std::io::Error::new(
                                std::io::ErrorKind::Other,
                                e.to_string(),
                            ),
                        }
                    };

                    debug!(path = %path.display(), error = %error, "Skipping unreadable entry");
                    events.send(Event::Crawl(CrawlEvent::Error {
                        path,
                        message: error.to_string(),
                    }));
                }
            }
        }

        stats.duration = start.elapsed();
        events.send(Event::Crawl(CrawlEvent::Completed {
            files_found: stats.files_found,
        }));

        // `tasks` drops here: the crawler's finished signal
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::queue::TaskQueue;
    use crate::core::stop::stop_pair;
    use crate::events::null_sender;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn create_file(dir: &Path, name: &str, content: &[u8]) {
        let mut file = File::create(dir.join(name)).unwrap();
        file.write_all(content).unwrap();
    }

    fn crawl_collecting(root: &Path, config: CrawlConfig) -> (CrawlStats, Vec<FileTask>) {
        let (tx, rx) = TaskQueue::bounded(1024);
        let (_handle, token) = stop_pair();
        let crawler = WalkDirCrawler::new(config);

        let stats = crawler
            .crawl(root, tx, &token, &null_sender())
            .unwrap();

        let mut collected = Vec::new();
        while let Some(task) = rx.try_recv() {
            collected.push(task);
        }
        (stats, collected)
    }

    #[test]
    fn empty_directory_queues_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let (stats, tasks) = crawl_collecting(temp_dir.path(), CrawlConfig::default());

        assert_eq!(stats.files_found, 0);
        assert!(tasks.is_empty());
    }

    #[test]
    fn finds_files_at_every_depth() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "root.bin", b"a");

        let nested = temp_dir.path().join("one").join("two");
        fs::create_dir_all(&nested).unwrap();
        create_file(&nested, "deep.bin", b"b");

        let (stats, tasks) = crawl_collecting(temp_dir.path(), CrawlConfig::default());

        assert_eq!(stats.files_found, 2);
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().any(|t| t.path.ends_with("root.bin")));
        assert!(tasks.iter().any(|t| t.path.ends_with("deep.bin")));
    }

    #[test]
    fn task_count_matches_regular_file_count() {
        let temp_dir = TempDir::new().unwrap();
        for i in 0..25 {
            create_file(temp_dir.path(), &format!("f{i}.bin"), b"x");
        }
        fs::create_dir(temp_dir.path().join("empty_subdir")).unwrap();

        let (stats, tasks) = crawl_collecting(temp_dir.path(), CrawlConfig::default());

        assert_eq!(stats.files_found, 25);
        assert_eq!(tasks.len(), 25);
    }

    #[test]
    fn records_file_sizes() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "sized.bin", &[0u8; 123]);

        let (_stats, tasks) = crawl_collecting(temp_dir.path(), CrawlConfig::default());

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].size, 123);
    }

    #[cfg(unix)]
    #[test]
    fn skips_symlinks_by_default() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "real.bin", b"content");
        std::os::unix::fs::symlink(
            temp_dir.path().join("real.bin"),
            temp_dir.path().join("link.bin"),
        )
        .unwrap();

        let (stats, tasks) = crawl_collecting(temp_dir.path(), CrawlConfig::default());

        assert_eq!(stats.files_found, 1);
        assert!(tasks[0].path.ends_with("real.bin"));
    }

    #[test]
    fn max_depth_limits_discovery() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "shallow.bin", b"a");

        let nested = temp_dir.path().join("sub");
        fs::create_dir(&nested).unwrap();
        create_file(&nested, "deep.bin", b"b");

        let config = CrawlConfig {
            max_depth: Some(1),
            ..Default::default()
        };
        let (stats, tasks) = crawl_collecting(temp_dir.path(), config);

        assert_eq!(stats.files_found, 1);
        assert!(tasks[0].path.ends_with("shallow.bin"));
    }

    #[cfg(unix)]
    #[test]
    fn permission_denied_subtree_is_skipped_not_fatal() {
        use crate::events::EventChannel;
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "visible.bin", b"a");

        let locked = temp_dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        create_file(&locked, "hidden.bin", b"b");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // A privileged process can list the directory regardless
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let (tx, rx) = TaskQueue::bounded(1024);
        let (_handle, token) = stop_pair();
        let (events, event_rx) = EventChannel::new();
        let crawler = WalkDirCrawler::new(CrawlConfig::default());

        let stats = crawler.crawl(temp_dir.path(), tx, &token, &events).unwrap();
        drop(events);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        // The sibling file is still found; the locked subtree is counted
        assert_eq!(stats.files_found, 1);
        assert_eq!(stats.walk_errors, 1);
        assert!(rx.recv().unwrap().path.ends_with("visible.bin"));

        let denial = event_rx
            .iter()
            .find_map(|e| match e {
                Event::Crawl(CrawlEvent::Error { message, .. }) => Some(message),
                _ => None,
            })
            .expect("a crawl error event should be emitted");
        assert!(denial.contains("Permission denied"));
    }

    #[test]
    fn stop_signal_interrupts_the_crawl() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "a.bin", b"a");

        let (tx, _rx) = TaskQueue::bounded(1024);
        let (handle, token) = stop_pair();
        handle.stop();

        let crawler = WalkDirCrawler::new(CrawlConfig::default());
        let stats = crawler
            .crawl(temp_dir.path(), tx, &token, &null_sender())
            .unwrap();

        assert!(stats.interrupted);
        assert_eq!(stats.files_found, 0);
    }
}
