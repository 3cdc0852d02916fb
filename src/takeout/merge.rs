//! Consolidating files shared by several albums
//!
//! Content found in albums `A` and `B` ends up once in a directory named
//! `A _, B` next to them; the album copies are deleted. Merge directories carry
//! an empty [`MERGED_MARKER`] file so a later run recognises them, indexes
//! them like albums and keeps their files where they are.

use super::fs::FileSystem;
use super::report::{Action, PhaseReport};
use super::scanner::MERGED_MARKER;
use super::sidecar::{move_sidecar, remove_sidecar};
use crate::core::error::{DedupError, Result};
use crate::duplicate::{hash_to_hex, DuplicateIndex, MediaItem};
use log::{debug, info};
use std::path::Path;

/// Name of the directory collecting the occurrences of one digest
///
/// Album names are joined in occurrence order; repeats are kept.
pub fn merge_group_name(items: &[MediaItem], separator: &str) -> String {
    items
        .iter()
        .map(|item| item.album_name.as_str())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Moves one copy of every shared file into its multi-album directory and
/// deletes the rest
pub struct CrossAlbumMerger<'a, F: FileSystem + ?Sized> {
    root: &'a Path,
    separator: &'a str,
    sidecar_suffix: &'a str,
    fs: &'a F,
}

impl<'a, F: FileSystem + ?Sized> CrossAlbumMerger<'a, F> {
    /// `root` is the directory merge directories are created in
    pub fn new(root: &'a Path, separator: &'a str, sidecar_suffix: &'a str, fs: &'a F) -> Self {
        Self {
            root,
            separator,
            sidecar_suffix,
            fs,
        }
    }

    /// Merge every digest of `index` found more than once
    pub fn merge_all(&self, index: &DuplicateIndex) -> PhaseReport {
        let mut report = PhaseReport::new(self.fs.is_dry_run());

        for (digest, items) in index.digests_with_multiple_occurrences() {
            report.examined += 1;
            debug!("Merging {} ({} copies)", hash_to_hex(digest), items.len());

            if let Err(e) = self.merge_group(items, &mut report) {
                report.fail(e);
            }
        }

        info!(
            "Merge finished: {} moved, {} deleted, {} directories created",
            report.moved(),
            report.deleted(),
            report.created_dirs()
        );
        report
    }

    fn is_in_merged_dir(&self, item: &MediaItem) -> bool {
        self.fs.exists(&item.album_path.join(MERGED_MARKER))
    }

    /// Merge the occurrences of a single digest
    ///
    /// An `Err` means the digest was skipped with no file moved or deleted,
    /// though a merge directory created for it just before a failed move is
    /// left in place and already recorded in `report`. Problems with the
    /// survivor's sidecar or with single residuals are recorded in `report`
    /// instead.
    pub fn merge_group(&self, items: &[MediaItem], report: &mut PhaseReport) -> Result<()> {
        let survivor_idx = items
            .iter()
            .position(|item| self.is_in_merged_dir(item))
            .unwrap_or(0);
        let survivor = &items[survivor_idx];

        if !self.fs.exists(&survivor.path) {
            return Err(DedupError::SurvivorMissing(survivor.path.clone()));
        }

        if !self.is_in_merged_dir(survivor) {
            self.relocate_survivor(items, survivor, report)?;
        } else {
            debug!("Keeping {} in place", survivor.path.display());
        }

        for (idx, item) in items.iter().enumerate() {
            if idx != survivor_idx {
                self.delete_residual(&item.path, report);
            }
        }

        Ok(())
    }

    fn relocate_survivor(
        &self,
        items: &[MediaItem],
        survivor: &MediaItem,
        report: &mut PhaseReport,
    ) -> Result<()> {
        let dest = self.root.join(merge_group_name(items, self.separator));
        let target = dest.join(&survivor.name);

        if self.fs.exists(&target) {
            return Err(DedupError::DestinationExists(target));
        }

        if !self.fs.exists(&dest) {
            self.create_merge_dir(&dest)?;
            report.push(Action::CreatedMergeDir { path: dest.clone() });
        }

        self.fs
            .rename(&survivor.path, &target)
            .map_err(|source| DedupError::Move {
                from: survivor.path.clone(),
                to: target.clone(),
                source,
            })?;

        let sidecar = match move_sidecar(self.fs, &survivor.path, &target, self.sidecar_suffix) {
            Ok(moved) => moved,
            Err(e) => {
                report.fail(e);
                false
            }
        };

        report.push(Action::MovedSurvivor {
            from: survivor.path.clone(),
            to: target,
            sidecar,
        });
        Ok(())
    }

    fn create_merge_dir(&self, dest: &Path) -> Result<()> {
        self.fs
            .create_dir(dest)
            .map_err(|source| DedupError::CreateDir {
                path: dest.to_path_buf(),
                source,
            })?;
        let marker = dest.join(MERGED_MARKER);
        self.fs
            .create_marker(&marker)
            .map_err(|source| DedupError::CreateDir {
                path: marker,
                source,
            })
    }

    fn delete_residual(&self, path: &Path, report: &mut PhaseReport) {
        if !self.fs.exists(path) {
            report.fail(DedupError::Vanished(path.to_path_buf()));
            return;
        }

        if let Err(source) = self.fs.remove_file(path) {
            report.fail(DedupError::Remove {
                path: path.to_path_buf(),
                source,
            });
            return;
        }

        let sidecar = match remove_sidecar(self.fs, path, self.sidecar_suffix) {
            Ok(removed) => removed,
            Err(e) => {
                report.fail(e);
                false
            }
        };

        report.push(Action::DeletedResidual {
            path: path.to_path_buf(),
            sidecar,
        });
    }
}
