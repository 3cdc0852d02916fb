//! Takeout reconciliation
//!
//! Everything that acts on an exported takeout tree: sorting its directories
//! into albums and dumps, indexing the albums, purging dumped copies of filed
//! media and merging media shared by several albums.
//!
//! # Submodules
//!
//! - `scanner` - Album / non-album classification and media listing
//! - `indexer` - Building or loading the album index
//! - `purge` - Deleting non-album files already filed in an album
//! - `merge` - Consolidating files shared by several albums
//! - `pipeline` - The phases of a complete run, in order
//! - `fs` - Filesystem seam with a dry-run implementation
//! - `sidecar` - `.json` metadata sidecars
//! - `report` - Actions and per-phase reports

pub mod fs;
pub mod indexer;
pub mod merge;
pub mod pipeline;
pub mod purge;
pub mod report;
pub mod scanner;
pub mod sidecar;

#[cfg(test)]
mod fixtures;

pub use fs::{DryRunFs, FileSystem, LocalFs};
pub use indexer::{
    build_index, prepare_index, IndexOutcome, IndexProgress, IndexSource, SnapshotPolicy,
};
pub use merge::{merge_group_name, CrossAlbumMerger};
pub use pipeline::{run, RunOptions, RunSummary};
pub use purge::OutsideAlbumPurger;
pub use report::{Action, PhaseReport};
pub use scanner::{AlbumScanner, DirectoryKind, TakeoutDir, TakeoutLayout, MERGED_MARKER};
