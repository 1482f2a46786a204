//! # Hasher Module
//!
//! Computes content checksums over file bytes.
//!
//! ## Supported Algorithms
//! - **BLAKE3** (default) - Collision-resistant cryptographic digest
//! - **XXH3** - Very fast non-cryptographic 64-bit digest
//!
//! Both algorithms stream the input in fixed-size chunks, so the
//! checksum of a file depends only on its byte content: same bytes,
//! same checksum, always.
//!
//! ## Example
//! ```rust,ignore
//! use dirhash::core::hasher::{HasherConfig, ChecksumAlgorithmKind};
//!
//! let hasher = HasherConfig::new()
//!     .algorithm(ChecksumAlgorithmKind::Blake3)
//!     .build();
//!
//! let (checksum, bytes) = hasher.checksum_file(&path)?;
//! ```

mod algorithms;

pub use algorithms::{Blake3Hasher, Xxh3Hasher};

use crate::error::HashError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Available checksum algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChecksumAlgorithmKind {
    /// BLAKE3 - cryptographic, collision-resistant (default)
    Blake3,
    /// XXH3 - non-cryptographic, fastest
    Xxh3,
}

impl ChecksumAlgorithmKind {
    /// Get a human-readable description of the algorithm
    pub fn description(&self) -> &'static str {
        match self {
            ChecksumAlgorithmKind::Blake3 => {
                "BLAKE3 - cryptographic 256-bit digest, collision-resistant"
            }
            ChecksumAlgorithmKind::Xxh3 => {
                "XXH3 - non-cryptographic 64-bit digest, fastest"
            }
        }
    }
}

impl std::fmt::Display for ChecksumAlgorithmKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChecksumAlgorithmKind::Blake3 => write!(f, "blake3"),
            ChecksumAlgorithmKind::Xxh3 => write!(f, "xxh3"),
        }
    }
}

/// A computed content checksum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksum {
    /// The raw digest bytes
    bytes: Vec<u8>,
    /// The algorithm that produced this checksum
    algorithm: ChecksumAlgorithmKind,
}

impl Checksum {
    /// Create a new checksum value
    pub fn new(bytes: Vec<u8>, algorithm: ChecksumAlgorithmKind) -> Self {
        Self { bytes, algorithm }
    }

    /// Get the raw digest bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Get the algorithm that produced this checksum
    pub fn algorithm(&self) -> ChecksumAlgorithmKind {
        self.algorithm
    }

    /// Get the checksum as a hexadecimal string
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

/// Trait for checksum algorithm implementations.
///
/// Implementations must be deterministic: identical byte content always
/// produces an identical checksum, regardless of which file or reader
/// the bytes came from.
pub trait ChecksumAlgorithm: Send + Sync {
    /// Compute a checksum over everything the reader yields.
    ///
    /// Returns the checksum together with the number of bytes consumed.
    fn checksum_reader(&self, reader: &mut dyn Read) -> std::io::Result<(Checksum, u64)>;

    /// Compute a checksum over an in-memory byte slice
    fn checksum_bytes(&self, data: &[u8]) -> Checksum;

    /// Compute a checksum over a file's full contents.
    ///
    /// Open and read failures are attributed to the file's path; the
    /// file is streamed through a buffered reader rather than loaded
    /// whole into memory.
    fn checksum_file(&self, path: &Path) -> Result<(Checksum, u64), HashError> {
        let file = File::open(path).map_err(|source| HashError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = BufReader::with_capacity(64 * 1024, file);
        self.checksum_reader(&mut reader)
            .map_err(|source| HashError::Read {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Get the algorithm kind
    fn kind(&self) -> ChecksumAlgorithmKind;
}

/// Configuration builder for hashers
#[derive(Debug, Clone)]
pub struct HasherConfig {
    /// Algorithm to use
    algorithm: ChecksumAlgorithmKind,
}

impl HasherConfig {
    /// Create a new hasher configuration with defaults
    pub fn new() -> Self {
        Self {
            algorithm: ChecksumAlgorithmKind::Blake3,
        }
    }

    /// Set the checksum algorithm
    pub fn algorithm(mut self, algorithm: ChecksumAlgorithmKind) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Build the hasher
    pub fn build(self) -> Box<dyn ChecksumAlgorithm> {
        match self.algorithm {
            ChecksumAlgorithmKind::Blake3 => Box::new(Blake3Hasher::new()),
            ChecksumAlgorithmKind::Xxh3 => Box::new(Xxh3Hasher::new()),
        }
    }
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_to_blake3() {
        let config = HasherConfig::new();
        assert_eq!(config.algorithm, ChecksumAlgorithmKind::Blake3);
    }

    #[test]
    fn config_builder_works() {
        let config = HasherConfig::new().algorithm(ChecksumAlgorithmKind::Xxh3);
        assert_eq!(config.algorithm, ChecksumAlgorithmKind::Xxh3);
    }

    #[test]
    fn build_creates_hasher_of_requested_kind() {
        let hasher = HasherConfig::new()
            .algorithm(ChecksumAlgorithmKind::Xxh3)
            .build();
        assert_eq!(hasher.kind(), ChecksumAlgorithmKind::Xxh3);
    }

    #[test]
    fn checksum_hex_rendering() {
        let checksum = Checksum::new(vec![0xDE, 0xAD, 0xBE, 0xEF], ChecksumAlgorithmKind::Xxh3);
        assert_eq!(checksum.to_hex(), "deadbeef");
    }

    #[test]
    fn algorithm_kind_display() {
        assert_eq!(ChecksumAlgorithmKind::Blake3.to_string(), "blake3");
        assert_eq!(ChecksumAlgorithmKind::Xxh3.to_string(), "xxh3");
    }
}
