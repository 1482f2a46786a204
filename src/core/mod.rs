//! # Core Module
//!
//! The UI-agnostic crawl/hash engine.
//!
//! ## Modules
//! - `crawler` - Walks the directory tree and queues discovered files
//! - `queue` - Bounded task channel connecting crawler to workers
//! - `hasher` - Computes content checksums
//! - `worker` - Fixed pool of hashing workers
//! - `stop` - One-shot cancellation signal
//! - `pipeline` - Orchestrates the full workflow

pub mod crawler;
pub mod hasher;
pub mod pipeline;
pub mod queue;
pub mod stop;
pub mod worker;

// Re-export commonly used types
pub use crawler::{CrawlConfig, CrawlStats, FileCrawler, WalkDirCrawler};
pub use hasher::{Checksum, ChecksumAlgorithm, ChecksumAlgorithmKind};
pub use pipeline::{Pipeline, PipelineReport};
pub use queue::FileTask;
pub use worker::{HashOutcome, HashResult};
