//! Building the album index
//!
//! Every media file of every album (and of every merged directory left by an
//! earlier run) is hashed and recorded. When a snapshot is available it is
//! loaded instead and no album file is read at all.

use super::scanner::{AlbumScanner, TakeoutDir};
use crate::duplicate::{DuplicateIndex, FileDigest, MediaItem};
use log::{info, trace, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Progress information for index building
#[derive(Debug, Clone)]
pub struct IndexProgress {
    /// Files processed so far
    pub current: usize,
    /// Total files to process
    pub total: usize,
    /// Album currently being hashed
    pub album: String,
    /// File currently being hashed
    pub current_file: Option<PathBuf>,
    /// Number of files that could not be hashed
    pub errors: usize,
}

/// Where the index of a run came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSource {
    /// Hashed from the albums during this run
    Built,
    /// Loaded from a snapshot file
    Snapshot(PathBuf),
}

/// How the snapshot is used when preparing the index
#[derive(Debug, Clone, Default)]
pub struct SnapshotPolicy {
    /// Snapshot file, if snapshots are enabled
    pub path: Option<PathBuf>,
    /// Ignore an existing snapshot and hash the albums again
    pub rehash: bool,
    /// Never write the snapshot (dry runs)
    pub read_only: bool,
}

/// Result of the indexing phase
#[derive(Debug)]
pub struct IndexOutcome {
    pub index: DuplicateIndex,
    pub source: IndexSource,
    /// Files that could not be hashed (always zero for a snapshot)
    pub errors: usize,
    pub build_time_ms: u64,
}

/// Hash every media file of `albums` into a fresh index
///
/// Unreadable files are logged and left out; the build carries on.
/// Returns the index and the number of files that could not be hashed.
pub fn build_index<H, F>(
    albums: &[TakeoutDir],
    scanner: &AlbumScanner,
    hasher: &H,
    mut progress_callback: F,
) -> (DuplicateIndex, usize)
where
    H: FileDigest + ?Sized,
    F: FnMut(IndexProgress),
{
    let mut index = DuplicateIndex::new();
    let mut errors = 0;

    let mut listings = Vec::with_capacity(albums.len());
    for album in albums {
        match scanner.media_files(&album.path) {
            Ok(files) => listings.push((album, files)),
            Err(e) => {
                warn!("Failed to list album {}: {}", album.path.display(), e);
                errors += 1;
            }
        }
    }

    let total: usize = listings.iter().map(|(_, files)| files.len()).sum();
    info!("Hashing {} files in {} album(s)", total, listings.len());

    let mut current = 0;
    for (album, files) in listings {
        info!("Hashing {}", album.name);

        for path in files {
            progress_callback(IndexProgress {
                current,
                total,
                album: album.name.clone(),
                current_file: Some(path.clone()),
                errors,
            });
            current += 1;

            match hasher.digest(&path) {
                Ok(digest) => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    index.record(
                        digest,
                        MediaItem::new(name, path, album.name.clone(), album.path.clone()),
                    );
                }
                Err(e) => {
                    warn!("{}", e);
                    errors += 1;
                }
            }
        }
    }

    progress_callback(IndexProgress {
        current,
        total,
        album: String::new(),
        current_file: None,
        errors,
    });

    (index, errors)
}

/// Load the index from the snapshot, or build and persist it
///
/// The snapshot is tied to the canonical form of `root`; one written for
/// another takeout is treated like an unreadable snapshot.
pub fn prepare_index<H, F>(
    root: &Path,
    albums: &[TakeoutDir],
    scanner: &AlbumScanner,
    hasher: &H,
    policy: &SnapshotPolicy,
    progress_callback: F,
) -> IndexOutcome
where
    H: FileDigest + ?Sized,
    F: FnMut(IndexProgress),
{
    let start_time = Instant::now();
    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());

    if let Some(path) = policy.path.as_deref() {
        if !policy.rehash && path.exists() {
            match DuplicateIndex::from_snapshot_for_root(path, &root) {
                Ok(index) => {
                    info!(
                        "Loaded {} digests from snapshot: {}",
                        index.len(),
                        path.display()
                    );
                    warn!(
                        "Album changes made after the snapshot was written are not detected; \
                         use --rehash to rebuild"
                    );
                    return IndexOutcome {
                        index,
                        source: IndexSource::Snapshot(path.to_path_buf()),
                        errors: 0,
                        build_time_ms: start_time.elapsed().as_millis() as u64,
                    };
                }
                Err(e) => {
                    warn!("Failed to load snapshot, rebuilding index: {}", e);
                }
            }
        }
    }

    let (index, errors) = build_index(albums, scanner, hasher, progress_callback);
    let stats = index.stats();
    info!(
        "Index built: {} files, {} unique hashes, {} duplicate groups, {} errors in {}ms",
        stats.total_items,
        stats.unique_hashes,
        stats.duplicate_groups,
        errors,
        start_time.elapsed().as_millis()
    );

    match policy.path.as_deref() {
        Some(path) if !policy.read_only => save_snapshot(&index, path, &root),
        _ => {}
    }

    IndexOutcome {
        index,
        source: IndexSource::Built,
        errors,
        build_time_ms: start_time.elapsed().as_millis() as u64,
    }
}

fn save_snapshot(index: &DuplicateIndex, path: &Path, root: &Path) {
    match index.persist_for_root(path, root) {
        Ok(()) => info!("Snapshot saved to: {}", path.display()),
        Err(e) => warn!("Failed to save snapshot: {}", e),
    }
    trace!("Snapshot holds {} occurrences", index.occurrence_count());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TakeoutConfig;
    use crate::duplicate::{compute_data_hash, ContentHasher};
    use crate::takeout::fixtures::Takeout;
    use crate::takeout::scanner::TakeoutLayout;

    fn scanner() -> AlbumScanner {
        AlbumScanner::from_config(&TakeoutConfig::default())
    }

    fn prepare<F>(
        takeout: &Takeout,
        layout: &TakeoutLayout,
        policy: &SnapshotPolicy,
        progress: F,
    ) -> IndexOutcome
    where
        F: FnMut(IndexProgress),
    {
        let hasher = ContentHasher::new();
        prepare_index(takeout.root(), &layout.albums, &scanner(), &hasher, policy, progress)
    }

    #[test]
    fn test_build_index_records_album_files() {
        let takeout = Takeout::new();
        takeout.file("A", "x.jpg", b"same");
        takeout.sidecar("A", "x.jpg");
        takeout.file("A", "y.jpg", b"only in A");
        takeout.file("B", "x.jpg", b"same");
        takeout.file("Photos from 2020", "x.jpg", b"same");

        let layout = scanner().classify(takeout.root()).unwrap();
        let mut calls = 0;
        let (index, errors) =
            build_index(&layout.albums, &scanner(), &ContentHasher::new(), |_| calls += 1);

        assert_eq!(errors, 0);
        assert_eq!(index.occurrence_count(), 3);
        assert_eq!(calls, 4);

        let items = index.lookup(&compute_data_hash(b"same")).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].album_name, "A");
        assert_eq!(items[0].name, "x.jpg");
        assert_eq!(items[0].path, takeout.path("A", "x.jpg"));
        assert_eq!(items[0].album_path, takeout.root().join("A"));
        assert_eq!(items[1].album_name, "B");
    }

    #[test]
    fn test_build_index_skips_unreadable_file() {
        let takeout = Takeout::new();
        takeout.file("A", "a.jpg", b"first");
        let vanishing = takeout.file("A", "b.jpg", b"second");
        takeout.file("A", "c.jpg", b"third");

        let layout = scanner().classify(takeout.root()).unwrap();
        let mut last_errors = 0;
        let (index, errors) =
            build_index(&layout.albums, &scanner(), &ContentHasher::new(), |p| {
                // removed after listing, just before it is read
                if p.current_file.as_deref() == Some(vanishing.as_path()) {
                    std::fs::remove_file(&vanishing).unwrap();
                }
                last_errors = p.errors;
            });

        assert_eq!(errors, 1);
        assert_eq!(last_errors, 1);
        assert_eq!(index.occurrence_count(), 2);
        assert!(index.contains(&compute_data_hash(b"first")));
        assert!(!index.contains(&compute_data_hash(b"second")));
        assert!(index.contains(&compute_data_hash(b"third")));
    }

    #[test]
    fn test_prepare_index_writes_then_reuses_snapshot() {
        let takeout = Takeout::new();
        takeout.file("A", "x.jpg", b"same");
        takeout.file("B", "x.jpg", b"same");
        let snapshot = takeout.root().join("dedup_hash.json");
        let policy = SnapshotPolicy {
            path: Some(snapshot.clone()),
            ..SnapshotPolicy::default()
        };

        let layout = scanner().classify(takeout.root()).unwrap();
        let first = prepare(&takeout, &layout, &policy, |_| {});
        assert_eq!(first.source, IndexSource::Built);
        assert!(snapshot.exists());

        // a file added later is not seen while the snapshot is trusted
        takeout.file("C", "x.jpg", b"same");
        let layout = scanner().classify(takeout.root()).unwrap();
        let second = prepare(&takeout, &layout, &policy, |_| panic!("snapshot run must not hash"));
        assert_eq!(second.source, IndexSource::Snapshot(snapshot.clone()));
        assert_eq!(second.index, first.index);

        let rehash = SnapshotPolicy {
            path: Some(snapshot),
            rehash: true,
            ..SnapshotPolicy::default()
        };
        let third = prepare(&takeout, &layout, &rehash, |_| {});
        assert_eq!(third.source, IndexSource::Built);
        assert_eq!(third.index.occurrence_count(), 3);
    }

    #[test]
    fn test_prepare_index_ignores_snapshot_of_other_takeout() {
        let shared = tempfile::TempDir::new().unwrap();
        let snapshot = shared.path().join("dedup_hash.json");
        let policy = SnapshotPolicy {
            path: Some(snapshot.clone()),
            ..SnapshotPolicy::default()
        };

        let first = Takeout::new();
        first.file("A", "x.jpg", b"same");
        first.file("B", "x.jpg", b"same");
        let layout = scanner().classify(first.root()).unwrap();
        prepare(&first, &layout, &policy, |_| {});
        assert!(snapshot.exists());

        let second = Takeout::new();
        second.file("C", "y.jpg", b"other");
        let layout = scanner().classify(second.root()).unwrap();
        let mut hashed = 0;
        let outcome = prepare(&second, &layout, &policy, |_| hashed += 1);

        assert_eq!(outcome.source, IndexSource::Built);
        assert!(hashed > 0);
        assert!(!outcome.index.contains(&compute_data_hash(b"same")));
        assert!(outcome.index.contains(&compute_data_hash(b"other")));

        // the rewritten snapshot now belongs to the second takeout
        let root = second.root().canonicalize().unwrap();
        assert!(DuplicateIndex::from_snapshot_for_root(&snapshot, &root).is_ok());
    }

    #[test]
    fn test_prepare_index_rebuilds_on_corrupt_snapshot() {
        let takeout = Takeout::new();
        takeout.file("A", "x.jpg", b"x");
        let snapshot = takeout.root().join("dedup_hash.json");
        std::fs::write(&snapshot, b"not json").unwrap();

        let layout = scanner().classify(takeout.root()).unwrap();
        let policy = SnapshotPolicy {
            path: Some(snapshot.clone()),
            ..SnapshotPolicy::default()
        };
        let outcome = prepare(&takeout, &layout, &policy, |_| {});

        assert_eq!(outcome.source, IndexSource::Built);
        assert_eq!(outcome.index.occurrence_count(), 1);
        assert!(DuplicateIndex::from_snapshot(&snapshot).is_ok());
    }

    #[test]
    fn test_prepare_index_read_only() {
        let takeout = Takeout::new();
        takeout.file("A", "x.jpg", b"x");
        let snapshot = takeout.root().join("dedup_hash.json");

        let layout = scanner().classify(takeout.root()).unwrap();
        let policy = SnapshotPolicy {
            path: Some(snapshot.clone()),
            read_only: true,
            ..SnapshotPolicy::default()
        };
        let outcome = prepare(&takeout, &layout, &policy, |_| {});

        assert_eq!(outcome.source, IndexSource::Built);
        assert!(!snapshot.exists());
    }
}
