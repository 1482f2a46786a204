//! # dirhash
//!
//! A concurrent directory tree checksummer.
//!
//! ## Core Idea
//! A single crawler thread walks the tree and feeds discovered files into a
//! bounded channel; a fixed pool of hasher threads drains the channel and
//! computes a content checksum per file, so directory I/O and hashing
//! overlap instead of running back to back.
//!
//! ## Architecture
//! The library is split into a core engine (UI-agnostic) and presentation
//! layers:
//! - `core` - The crawl/hash pipeline
//! - `events` - Event-driven progress reporting
//! - `error` - Error types
//! - `cli` - Command-line interface

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{DirHashError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
