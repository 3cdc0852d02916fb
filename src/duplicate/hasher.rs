//! Streaming content digests
//!
//! Files are read in fixed-size blocks through a single reusable buffer, so
//! hashing a multi-gigabyte video costs the same memory as hashing a thumbnail.
//! The digest depends only on the bytes of the file, never on the block size.

use crate::core::error::{DedupError, Result};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Default block size for streaming hash computation (1 MiB)
pub const DEFAULT_BLOCK_SIZE: usize = 1024 * 1024;

/// MD5 digest represented as a fixed-size array
pub type Md5Digest = [u8; 16];

/// Computes content digests of files on disk
#[derive(Debug, Clone)]
pub struct ContentHasher {
    block_size: usize,
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentHasher {
    /// Create a hasher reading 1 MiB at a time
    pub fn new() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }

    /// Create a hasher with a custom block size (minimum one byte)
    pub fn with_block_size(block_size: usize) -> Self {
        Self {
            block_size: block_size.max(1),
        }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Compute the MD5 digest of a file using streaming (memory-efficient)
    pub fn hash_file(&self, path: &Path) -> Result<Md5Digest> {
        let hash_error = |source| DedupError::Hash {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(hash_error)?;
        let mut context = md5::Context::new();
        let mut buffer = vec![0u8; self.block_size];

        loop {
            let bytes_read = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(hash_error(e)),
            };

            context.consume(&buffer[..bytes_read]);
        }

        Ok(context.compute().0)
    }
}

/// Digests files on disk for the indexer and the purger
pub trait FileDigest {
    fn digest(&self, path: &Path) -> Result<Md5Digest>;
}

impl FileDigest for ContentHasher {
    fn digest(&self, path: &Path) -> Result<Md5Digest> {
        self.hash_file(path)
    }
}

/// Compute the MD5 digest of in-memory data
pub fn compute_data_hash(data: &[u8]) -> Md5Digest {
    md5::compute(data).0
}

/// Convert a digest to a lowercase hexadecimal string
pub fn hash_to_hex(hash: &Md5Digest) -> String {
    hash.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Parse a hexadecimal string to a digest
pub fn hex_to_hash(hex: &str) -> Option<Md5Digest> {
    if hex.len() != 32 {
        return None;
    }

    let mut hash = [0u8; 16];
    for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
        let hex_str = std::str::from_utf8(chunk).ok()?;
        hash[i] = u8::from_str_radix(hex_str, 16).ok()?;
    }

    Some(hash)
}
