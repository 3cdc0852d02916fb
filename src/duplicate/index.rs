//! Digest → occurrences index
//!
//! The index remembers, for every content digest, each file that was found
//! with that content and the album it was found in. Occurrences keep their
//! discovery order and digests keep the order in which they were first seen,
//! so the first occurrence of a digest is always the first copy the scan met.
//!
//! # Example
//!
//! ```rust,no_run
//! use takeout_dedup::duplicate::{compute_data_hash, DuplicateIndex, MediaItem};
//!
//! let mut index = DuplicateIndex::new();
//! let digest = compute_data_hash(b"same bytes");
//! index.record(digest, MediaItem::new("x.jpg", "Trip/x.jpg", "Trip", "Trip"));
//! index.record(digest, MediaItem::new("x.jpg", "Family/x.jpg", "Family", "Family"));
//!
//! for (_, items) in index.digests_with_multiple_occurrences() {
//!     println!("{} copies", items.len());
//! }
//! ```

use super::hasher::Md5Digest;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// One physical file found in one album
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    /// File name
    pub name: String,
    /// Path of the file
    pub path: PathBuf,
    /// Name of the owning album directory
    pub album_name: String,
    /// Path of the owning album directory
    pub album_path: PathBuf,
}

impl MediaItem {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        album_name: impl Into<String>,
        album_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            album_name: album_name.into(),
            album_path: album_path.into(),
        }
    }
}

/// Statistics about the duplicate index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Total number of occurrences recorded
    pub total_items: usize,
    /// Number of distinct digests
    pub unique_hashes: usize,
    /// Number of digests with more than one occurrence
    pub duplicate_groups: usize,
    /// Number of occurrences beyond the first of each digest
    pub duplicate_items: usize,
}

/// The content-addressed index of album files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateIndex {
    /// Digests in first-seen order
    order: Vec<Md5Digest>,

    /// Digest -> occurrences in discovery order
    occurrences: HashMap<Md5Digest, Vec<MediaItem>>,
}

impl DuplicateIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an occurrence of `digest`
    pub fn record(&mut self, digest: Md5Digest, item: MediaItem) {
        match self.occurrences.get_mut(&digest) {
            Some(items) => items.push(item),
            None => {
                self.order.push(digest);
                self.occurrences.insert(digest, vec![item]);
            }
        }
    }

    /// All occurrences of a digest, if any were recorded
    pub fn lookup(&self, digest: &Md5Digest) -> Option<&[MediaItem]> {
        self.occurrences.get(digest).map(Vec::as_slice)
    }

    pub fn contains(&self, digest: &Md5Digest) -> bool {
        self.occurrences.contains_key(digest)
    }

    /// Iterate every digest with its occurrences, in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&Md5Digest, &[MediaItem])> + '_ {
        self.order.iter().filter_map(move |digest| {
            self.occurrences
                .get(digest)
                .map(|items| (digest, items.as_slice()))
        })
    }

    /// Digests that were found at least twice
    ///
    /// Lazy and restartable: every call scans the index afresh.
    pub fn digests_with_multiple_occurrences(
        &self,
    ) -> impl Iterator<Item = (&Md5Digest, &[MediaItem])> + '_ {
        self.iter().filter(|(_, items)| items.len() > 1)
    }

    /// Number of distinct digests
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of recorded occurrences across all digests
    pub fn occurrence_count(&self) -> usize {
        self.occurrences.values().map(Vec::len).sum()
    }

    /// Compute statistics about the index
    pub fn stats(&self) -> IndexStats {
        let mut stats = IndexStats {
            total_items: self.occurrence_count(),
            unique_hashes: self.len(),
            ..IndexStats::default()
        };

        for items in self.occurrences.values() {
            if items.len() > 1 {
                stats.duplicate_groups += 1;
                stats.duplicate_items += items.len() - 1;
            }
        }

        stats
    }

    /// Drop everything recorded so far
    pub(crate) fn clear(&mut self) {
        self.order.clear();
        self.occurrences.clear();
    }
}
