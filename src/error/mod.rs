//! # Error Module
//!
//! Error types for the directory checksummer.
//!
//! ## Design Principles
//! - **Never panic** on filesystem state - return errors instead
//! - **Include context** - paths and the underlying I/O error
//! - **Failures are data** - per-file errors travel inside `HashResult`
//!   rather than tearing down a worker

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum DirHashError {
    #[error("Crawl error: {0}")]
    Scan(#[from] ScanError),

    #[error("Hashing error: {0}")]
    Hash(#[from] HashError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that occur while crawling the directory tree
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Root path not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Crawl was cancelled")]
    Cancelled,
}

/// Errors that occur while hashing a single file.
///
/// These are recoverable: the worker wraps them into a failed
/// `HashResult` and moves on to the next task.
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Failed to open file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, DirHashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_error_includes_path() {
        let error = ScanError::RootNotFound {
            path: PathBuf::from("/data/archive"),
        };
        let message = error.to_string();
        assert!(message.contains("/data/archive"));
    }

    #[test]
    fn hash_error_includes_path_and_source() {
        let error = HashError::Open {
            path: PathBuf::from("/data/gone.bin"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let message = error.to_string();
        assert!(message.contains("/data/gone.bin"));
        assert!(message.contains("not found"));
    }

    #[test]
    fn permission_denied_names_the_path() {
        let error = ScanError::PermissionDenied {
            path: PathBuf::from("/data/locked"),
        };
        assert!(error.to_string().contains("/data/locked"));
    }
}
