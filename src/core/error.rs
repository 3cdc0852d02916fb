//! Error types for the takeout deduplicator
//!
//! Only `RootNotFound` is fatal for a run. Every other variant is reported
//! against the item or digest it concerns and the phase moves on.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the takeout deduplicator
#[derive(Error, Debug)]
pub enum DedupError {
    /// The takeout root directory does not exist or is not a directory
    #[error("Input directory not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// A file could not be opened or read while computing its digest
    #[error("Failed to hash '{}': {source}", .path.display())]
    Hash {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A media or sidecar file could not be deleted
    #[error("Failed to delete '{}': {source}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A media or sidecar file could not be moved
    #[error("Failed to move '{}' to '{}': {source}", .from.display(), .to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A merge destination directory could not be created
    #[error("Failed to create directory '{}': {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The merge destination already holds a file with the survivor's name
    #[error("Refusing to overwrite existing file: {}", .0.display())]
    DestinationExists(PathBuf),

    /// The file chosen to survive a merge is gone (stale index or earlier run)
    #[error("Survivor no longer exists: {}", .0.display())]
    SurvivorMissing(PathBuf),

    /// An occurrence recorded in the index is gone
    #[error("Indexed file no longer exists: {}", .0.display())]
    Vanished(PathBuf),

    /// The index snapshot could not be read, parsed or written
    #[error("Index snapshot '{}': {message}", .path.display())]
    Snapshot { path: PathBuf, message: String },

    /// General I/O error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, DedupError>;

impl DedupError {
    pub(crate) fn snapshot(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        DedupError::Snapshot {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Whether this error should stop the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self, DedupError::RootNotFound(_))
    }
}
