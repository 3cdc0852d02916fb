//! Content-addressed duplicate index
//!
//! Files are identified by the MD5 digest of their content. The index maps
//! every digest to the album files carrying it and can be persisted as a JSON
//! snapshot so later runs skip hashing.
//!
//! # Submodules
//!
//! - `hasher` - Streaming file digests
//! - `index` - Digest to occurrences map
//! - `snapshot` - JSON persistence of the index

pub mod hasher;
pub mod index;
pub mod snapshot;

pub use hasher::{
    compute_data_hash, hash_to_hex, hex_to_hash, ContentHasher, FileDigest, Md5Digest,
    DEFAULT_BLOCK_SIZE,
};
pub use index::{DuplicateIndex, IndexStats, MediaItem};
