//! Index snapshots on disk
//!
//! A snapshot lets a later run skip hashing the albums altogether. The file is
//! JSON, digest (hex) to the ordered list of occurrences:
//!
//! ```json
//! {
//!   "version": 1,
//!   "createdAt": 1700000000,
//!   "root": "/home/me/Takeout",
//!   "occurrences": {
//!     "5d41402abc4b2a76b9719d911017c592": [
//!       {
//!         "name": "x.jpg",
//!         "path": "Takeout/Trip/x.jpg",
//!         "albumName": "Trip",
//!         "albumPath": "Takeout/Trip"
//!       }
//!     ]
//!   }
//! }
//! ```
//!
//! Bare dumps written by the old script
//! (`{ "<hex>": [ { "item": {..}, "album": {..} } ] }`) are accepted on load
//! as well. A snapshot that records the takeout root it was built from is
//! refused for any other root; nothing checks that it still matches the albums
//! on disk.

use super::hasher::{hash_to_hex, hex_to_hash, Md5Digest};
use super::index::{DuplicateIndex, MediaItem};
use crate::core::error::{DedupError, Result};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const CURRENT_VERSION: u32 = 1;

/// Snapshot as written: borrows the index
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRef<'a> {
    version: u32,
    created_at: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    root: Option<&'a Path>,
    occurrences: OccurrencesRef<'a>,
}

struct OccurrencesRef<'a>(&'a DuplicateIndex);

impl Serialize for OccurrencesRef<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (digest, items) in self.0.iter() {
            map.serialize_entry(&hash_to_hex(digest), items)?;
        }
        map.end()
    }
}

/// Snapshot as read back
#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Current(Snapshot),
    Legacy(Occurrences),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    version: u32,
    #[serde(default)]
    #[allow(dead_code)]
    created_at: u64,
    #[serde(default)]
    root: Option<PathBuf>,
    occurrences: Occurrences,
}

/// Digest -> occurrences, keeping the order of the file
struct Occurrences(Vec<(Md5Digest, Vec<StoredItem>)>);

impl<'de> Deserialize<'de> for Occurrences {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OccurrencesVisitor;

        impl<'de> Visitor<'de> for OccurrencesVisitor {
            type Value = Occurrences;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of hex digests to lists of media items")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, items)) = access.next_entry::<String, Vec<StoredItem>>()? {
                    let digest = hex_to_hash(&key).ok_or_else(|| {
                        de::Error::custom(format!("invalid digest '{}'", key))
                    })?;
                    entries.push((digest, items));
                }
                Ok(Occurrences(entries))
            }
        }

        deserializer.deserialize_map(OccurrencesVisitor)
    }
}

/// A record in either the current flat layout or the old nested one
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredItem {
    Flat(MediaItem),
    Nested { item: NamedPath, album: NamedPath },
}

#[derive(Deserialize)]
struct NamedPath {
    name: String,
    path: PathBuf,
}

impl From<StoredItem> for MediaItem {
    fn from(stored: StoredItem) -> Self {
        match stored {
            StoredItem::Flat(item) => item,
            StoredItem::Nested { item, album } => {
                MediaItem::new(item.name, item.path, album.name, album.path)
            }
        }
    }
}

impl DuplicateIndex {
    /// Save the index to a snapshot file
    pub fn persist(&self, path: &Path) -> Result<()> {
        self.write_snapshot(path, None)
    }

    /// Save the index to a snapshot file tied to the takeout `root`
    pub fn persist_for_root(&self, path: &Path, root: &Path) -> Result<()> {
        self.write_snapshot(path, Some(root))
    }

    fn write_snapshot(&self, path: &Path, root: Option<&Path>) -> Result<()> {
        let snapshot = SnapshotRef {
            version: CURRENT_VERSION,
            created_at: SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            root,
            occurrences: OccurrencesRef(self),
        };

        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| DedupError::snapshot(path, format!("failed to serialize: {}", e)))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    DedupError::snapshot(path, format!("failed to create directory: {}", e))
                })?;
            }
        }

        fs::write(path, json)
            .map_err(|e| DedupError::snapshot(path, format!("failed to write: {}", e)))?;

        Ok(())
    }

    /// Replace the contents of this index with a snapshot file
    ///
    /// On error the index is left untouched.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        self.read_snapshot(path, None)
    }

    /// Like [`load`](Self::load), but refuse a snapshot built for another root
    ///
    /// Snapshots that record no root (old dumps) are accepted.
    pub fn load_for_root(&mut self, path: &Path, root: &Path) -> Result<()> {
        self.read_snapshot(path, Some(root))
    }

    fn read_snapshot(&mut self, path: &Path, expected_root: Option<&Path>) -> Result<()> {
        let json = fs::read_to_string(path)
            .map_err(|e| DedupError::snapshot(path, format!("failed to read: {}", e)))?;

        let file: SnapshotFile = serde_json::from_str(&json)
            .map_err(|e| DedupError::snapshot(path, format!("failed to parse: {}", e)))?;

        let occurrences = match file {
            SnapshotFile::Current(snapshot) => {
                if snapshot.version != CURRENT_VERSION {
                    return Err(DedupError::snapshot(
                        path,
                        format!(
                            "version mismatch: expected {}, got {}",
                            CURRENT_VERSION, snapshot.version
                        ),
                    ));
                }
                match (snapshot.root.as_deref(), expected_root) {
                    (Some(recorded), Some(expected)) if recorded != expected => {
                        return Err(DedupError::snapshot(
                            path,
                            format!(
                                "built for {}, not {}",
                                recorded.display(),
                                expected.display()
                            ),
                        ));
                    }
                    _ => {}
                }
                snapshot.occurrences
            }
            SnapshotFile::Legacy(occurrences) => occurrences,
        };

        self.clear();
        for (digest, items) in occurrences.0 {
            for item in items {
                self.record(digest, item.into());
            }
        }

        Ok(())
    }

    /// Build a new index from a snapshot file
    pub fn from_snapshot(path: &Path) -> Result<Self> {
        let mut index = Self::new();
        index.load(path)?;
        Ok(index)
    }

    /// Build a new index from a snapshot file made for `root`
    pub fn from_snapshot_for_root(path: &Path, root: &Path) -> Result<Self> {
        let mut index = Self::new();
        index.load_for_root(path, root)?;
        Ok(index)
    }
}
