//! Checksum algorithm implementations.
//!
//! Both hashers stream input in 64 KiB chunks so the digest depends only
//! on byte content, never on read boundaries or file size up front.

use super::{Checksum, ChecksumAlgorithm, ChecksumAlgorithmKind};
use std::io::Read;
use xxhash_rust::xxh3::Xxh3;

const CHUNK_SIZE: usize = 64 * 1024;

/// BLAKE3 content hasher. Cryptographic, collision-resistant.
#[derive(Debug, Default)]
pub struct Blake3Hasher;

impl Blake3Hasher {
    pub fn new() -> Self {
        Self
    }
}

impl ChecksumAlgorithm for Blake3Hasher {
    fn checksum_reader(&self, reader: &mut dyn Read) -> std::io::Result<(Checksum, u64)> {
        let mut hasher = blake3::Hasher::new();
        let mut buf = [0u8; CHUNK_SIZE];
        let mut total: u64 = 0;

        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
            total += n as u64;
        }

        let digest = hasher.finalize();
        Ok((
            Checksum::new(digest.as_bytes().to_vec(), ChecksumAlgorithmKind::Blake3),
            total,
        ))
    }

    fn checksum_bytes(&self, data: &[u8]) -> Checksum {
        let digest = blake3::hash(data);
        Checksum::new(digest.as_bytes().to_vec(), ChecksumAlgorithmKind::Blake3)
    }

    fn kind(&self) -> ChecksumAlgorithmKind {
        ChecksumAlgorithmKind::Blake3
    }
}

/// XXH3 content hasher. Non-cryptographic, built for throughput.
#[derive(Debug, Default)]
pub struct Xxh3Hasher;

impl Xxh3Hasher {
    pub fn new() -> Self {
        Self
    }
}

impl ChecksumAlgorithm for Xxh3Hasher {
    fn checksum_reader(&self, reader: &mut dyn Read) -> std::io::Result<(Checksum, u64)> {
        let mut hasher = Xxh3::new();
        let mut buf = [0u8; CHUNK_SIZE];
        let mut total: u64 = 0;

        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
            total += n as u64;
        }

        Ok((
            Checksum::new(
                hasher.digest().to_be_bytes().to_vec(),
                ChecksumAlgorithmKind::Xxh3,
            ),
            total,
        ))
    }

    fn checksum_bytes(&self, data: &[u8]) -> Checksum {
        Checksum::new(
            xxhash_rust::xxh3::xxh3_64(data).to_be_bytes().to_vec(),
            ChecksumAlgorithmKind::Xxh3,
        )
    }

    fn kind(&self) -> ChecksumAlgorithmKind {
        ChecksumAlgorithmKind::Xxh3
    }
}
