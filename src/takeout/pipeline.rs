//! The full deduplication run
//!
//! Classification, indexing, purge and merge run one after another; each
//! phase starts only once the previous one has finished.

use super::fs::{DryRunFs, FileSystem, LocalFs};
use super::indexer::{prepare_index, IndexProgress, IndexSource, SnapshotPolicy};
use super::merge::CrossAlbumMerger;
use super::purge::OutsideAlbumPurger;
use super::report::PhaseReport;
use super::scanner::AlbumScanner;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::duplicate::{ContentHasher, IndexStats};
use log::{info, warn};
use std::fs;
use std::path::Path;

/// Which phases run and how
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Report what would happen without touching the disk
    pub dry_run: bool,
    /// Run the outside-album purge
    pub purge: bool,
    /// Run the cross-album merge
    pub merge: bool,
    /// Load and save the snapshot file configured in `[index]`
    pub use_snapshot: bool,
    /// Hash the albums even if a snapshot exists
    pub rehash: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            purge: true,
            merge: true,
            use_snapshot: true,
            rehash: false,
        }
    }
}

/// Everything a run did
#[derive(Debug)]
pub struct RunSummary {
    /// Album directories, merged ones included
    pub albums: usize,
    pub non_albums: usize,
    pub merged_dirs: usize,
    pub index_stats: IndexStats,
    pub index_source: IndexSource,
    /// Album files that could not be hashed
    pub hash_errors: usize,
    pub purge: Option<PhaseReport>,
    pub merge: Option<PhaseReport>,
    pub dry_run: bool,
}

impl RunSummary {
    /// Failures across all phases, hashing included
    pub fn failure_count(&self) -> usize {
        self.hash_errors
            + self.purge.as_ref().map_or(0, |r| r.failures.len())
            + self.merge.as_ref().map_or(0, |r| r.failures.len())
    }

    pub fn is_clean(&self) -> bool {
        self.failure_count() == 0
    }
}

/// Run the enabled phases over the takeout at `root`
///
/// Only a missing root aborts the run; everything else is collected in the
/// phase reports.
pub fn run<P>(
    root: &Path,
    config: &Config,
    options: &RunOptions,
    progress: P,
) -> Result<RunSummary>
where
    P: FnMut(IndexProgress),
{
    let scanner = AlbumScanner::from_config(&config.takeout);
    let hasher = ContentHasher::with_block_size(config.index.block_size);

    let layout = scanner.classify(root)?;
    info!(
        "Found {} album(s) ({} merged) and {} non-album directories in {}",
        layout.albums.len(),
        layout.merged_count(),
        layout.non_albums.len(),
        root.display()
    );

    let snapshot_path = (options.use_snapshot && config.index.snapshot_enabled)
        .then(|| config.index.snapshot_file.clone());
    let policy = SnapshotPolicy {
        path: snapshot_path.clone(),
        rehash: options.rehash,
        read_only: options.dry_run,
    };
    let outcome = prepare_index(root, &layout.albums, &scanner, &hasher, &policy, progress);

    let local = LocalFs;
    let dry = DryRunFs::new();
    let fs: &dyn FileSystem = if options.dry_run { &dry } else { &local };

    let purge = options.purge.then(|| {
        info!("Purging duplicates outside albums");
        OutsideAlbumPurger::new(&scanner, &hasher, &outcome.index, fs).purge_all(&layout.non_albums)
    });

    let merge = options.merge.then(|| {
        info!("Merging duplicates across albums");
        CrossAlbumMerger::new(
            root,
            &config.takeout.merge_separator,
            &config.takeout.sidecar_suffix,
            fs,
        )
        .merge_all(&outcome.index)
    });

    if let (Some(report), Some(path)) = (&merge, &snapshot_path) {
        if !report.dry_run && !report.actions.is_empty() {
            discard_snapshot(path);
        }
    }

    Ok(RunSummary {
        albums: layout.albums.len(),
        non_albums: layout.non_albums.len(),
        merged_dirs: layout.merged_count(),
        index_stats: outcome.index.stats(),
        index_source: outcome.source,
        hash_errors: outcome.errors,
        purge,
        merge,
        dry_run: options.dry_run,
    })
}

/// The merge moved album files, so the snapshot no longer describes them
fn discard_snapshot(path: &Path) {
    if !path.exists() {
        return;
    }
    match fs::remove_file(path) {
        Ok(()) => info!("Discarded outdated snapshot: {}", path.display()),
        Err(e) => warn!("Failed to discard snapshot {}: {}", path.display(), e),
    }
}
