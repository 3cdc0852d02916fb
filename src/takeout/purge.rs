//! Purging duplicates outside the albums
//!
//! A file in an unsorted dump whose content is already filed in some album is
//! redundant and is deleted together with its sidecar. Files that are not in
//! the index stay, and the index never learns about them, so two identical
//! unfiled files are both kept.

use super::fs::FileSystem;
use super::report::{Action, PhaseReport};
use super::scanner::{AlbumScanner, TakeoutDir};
use super::sidecar::remove_sidecar;
use crate::core::error::DedupError;
use crate::duplicate::{hash_to_hex, ContentHasher, DuplicateIndex, FileDigest};
use log::{debug, info};
use std::path::Path;

/// Deletes non-album files that duplicate an album file
pub struct OutsideAlbumPurger<'a, F, H = ContentHasher>
where
    F: FileSystem + ?Sized,
    H: FileDigest + ?Sized,
{
    scanner: &'a AlbumScanner,
    hasher: &'a H,
    index: &'a DuplicateIndex,
    fs: &'a F,
}

impl<'a, F, H> OutsideAlbumPurger<'a, F, H>
where
    F: FileSystem + ?Sized,
    H: FileDigest + ?Sized,
{
    pub fn new(
        scanner: &'a AlbumScanner,
        hasher: &'a H,
        index: &'a DuplicateIndex,
        fs: &'a F,
    ) -> Self {
        Self {
            scanner,
            hasher,
            index,
            fs,
        }
    }

    /// Purge every directory of `dirs` into a single report
    pub fn purge_all(&self, dirs: &[TakeoutDir]) -> PhaseReport {
        let mut report = PhaseReport::new(self.fs.is_dry_run());
        for dir in dirs {
            info!("Purging {}", dir.name);
            self.purge_dir(&dir.path, &mut report);
        }
        report
    }

    /// Delete the indexed duplicates found directly inside `dir`
    pub fn purge_dir(&self, dir: &Path, report: &mut PhaseReport) {
        let files = match self.scanner.media_files(dir) {
            Ok(files) => files,
            Err(e) => {
                report.fail(e);
                return;
            }
        };

        for path in files {
            report.examined += 1;

            let digest = match self.hasher.digest(&path) {
                Ok(digest) => digest,
                Err(e) => {
                    report.fail(e);
                    continue;
                }
            };

            if !self.index.contains(&digest) {
                debug!("Keeping {} ({})", path.display(), hash_to_hex(&digest));
                continue;
            }

            if let Err(source) = self.fs.remove_file(&path) {
                report.fail(DedupError::Remove { path, source });
                continue;
            }

            let sidecar = match remove_sidecar(self.fs, &path, self.scanner.sidecar_suffix()) {
                Ok(removed) => removed,
                Err(e) => {
                    report.fail(e);
                    false
                }
            };

            report.push(Action::DeletedDuplicate { path, sidecar });
        }
    }
}
