//! Takeout directory classification
//!
//! The takeout root holds one directory per album plus date-named dumps such
//! as `Photos from 2020`. Only the root's immediate subdirectories are
//! considered, and only the files directly inside each of them.

use super::sidecar::is_sidecar;
use crate::core::config::TakeoutConfig;
use crate::core::error::{DedupError, Result};
use log::{debug, trace};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Name of the empty file marking a directory created by the merge phase
pub const MERGED_MARKER: &str = ".multi-album";

/// What a top-level takeout directory is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryKind {
    /// User-curated album
    Album,
    /// Unsorted dump such as "Photos from 2020"
    NonAlbum,
    /// Multi-album directory created by an earlier merge
    Merged,
}

/// A top-level directory of the takeout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TakeoutDir {
    pub name: String,
    pub path: PathBuf,
    pub kind: DirectoryKind,
}

/// The classified directories of a takeout root, each list sorted by name
#[derive(Debug, Clone, Default)]
pub struct TakeoutLayout {
    /// Albums and merged directories, the ones that feed the index
    pub albums: Vec<TakeoutDir>,
    /// Unsorted dumps
    pub non_albums: Vec<TakeoutDir>,
}

impl TakeoutLayout {
    pub fn merged_count(&self) -> usize {
        self.albums
            .iter()
            .filter(|dir| dir.kind == DirectoryKind::Merged)
            .count()
    }
}

/// Classifies takeout directories and lists their media files
#[derive(Debug, Clone)]
pub struct AlbumScanner {
    non_album_prefix: String,
    sidecar_suffix: String,
}

impl AlbumScanner {
    pub fn new(non_album_prefix: impl Into<String>, sidecar_suffix: impl Into<String>) -> Self {
        Self {
            non_album_prefix: non_album_prefix.into(),
            sidecar_suffix: sidecar_suffix.into(),
        }
    }

    pub fn from_config(config: &TakeoutConfig) -> Self {
        Self::new(&config.non_album_prefix, &config.sidecar_suffix)
    }

    pub fn sidecar_suffix(&self) -> &str {
        &self.sidecar_suffix
    }

    /// Sort the subdirectories of `root` into albums and non-albums
    pub fn classify(&self, root: &Path) -> Result<TakeoutLayout> {
        if !root.is_dir() {
            return Err(DedupError::RootNotFound(root.to_path_buf()));
        }

        let mut layout = TakeoutLayout::default();

        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(walk_error)?;
            // follows symlinks; dangling links are skipped
            if !entry.path().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.into_path();
            let kind = self.kind_of(&name, &path);
            debug!("{:?}: {}", kind, path.display());

            let dir = TakeoutDir { name, path, kind };
            match kind {
                DirectoryKind::NonAlbum => layout.non_albums.push(dir),
                DirectoryKind::Album | DirectoryKind::Merged => layout.albums.push(dir),
            }
        }

        Ok(layout)
    }

    fn kind_of(&self, name: &str, path: &Path) -> DirectoryKind {
        if !self.non_album_prefix.is_empty() && name.starts_with(&self.non_album_prefix) {
            DirectoryKind::NonAlbum
        } else if is_merged_dir(path) {
            DirectoryKind::Merged
        } else {
            DirectoryKind::Album
        }
    }

    /// Media files directly inside `dir`, sorted by name
    ///
    /// Sidecars, the merge marker and subdirectories are left out.
    pub fn media_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(walk_error)?;
            if !entry.path().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if name == MERGED_MARKER || is_sidecar(&name, &self.sidecar_suffix) {
                trace!("Skipping {}", entry.path().display());
                continue;
            }

            files.push(entry.into_path());
        }

        Ok(files)
    }
}

/// Whether `dir` was created by the merge phase
pub fn is_merged_dir(dir: &Path) -> bool {
    dir.join(MERGED_MARKER).is_file()
}

fn walk_error(err: walkdir::Error) -> DedupError {
    match err.into_io_error() {
        Some(io) => DedupError::Io(io),
        None => DedupError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "filesystem loop detected",
        )),
    }
}
