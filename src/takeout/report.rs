//! What the purge and merge phases did
//!
//! Every destructive or structural step becomes an [`Action`], rendered as one
//! line naming the affected paths. Failures are kept alongside; they never stop
//! a phase.

use crate::core::error::DedupError;
use log::{info, warn};
use std::fmt;
use std::path::PathBuf;

/// A single step performed (or, in a dry run, planned) on the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A file outside the albums duplicated an album file and was deleted
    DeletedDuplicate { path: PathBuf, sidecar: bool },
    /// A multi-album directory was created
    CreatedMergeDir { path: PathBuf },
    /// The surviving copy was moved into its multi-album directory
    MovedSurvivor {
        from: PathBuf,
        to: PathBuf,
        sidecar: bool,
    },
    /// A redundant album copy was deleted
    DeletedResidual { path: PathBuf, sidecar: bool },
}

fn sidecar_note(sidecar: bool) -> &'static str {
    if sidecar {
        " (and .json)"
    } else {
        ""
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::DeletedDuplicate { path, sidecar } => write!(
                f,
                "Deleting duplicate: {}{}",
                path.display(),
                sidecar_note(*sidecar)
            ),
            Action::CreatedMergeDir { path } => {
                write!(f, "Creating multi-album: {}", path.display())
            }
            Action::MovedSurvivor { from, to, sidecar } => write!(
                f,
                "Moving {} to {}{}",
                from.display(),
                to.display(),
                sidecar_note(*sidecar)
            ),
            Action::DeletedResidual { path, sidecar } => write!(
                f,
                "Deleting residual: {}{}",
                path.display(),
                sidecar_note(*sidecar)
            ),
        }
    }
}

/// Outcome of one phase
#[derive(Debug, Default)]
pub struct PhaseReport {
    /// Files (purge) or digests (merge) looked at
    pub examined: usize,
    /// Steps taken, in order
    pub actions: Vec<Action>,
    /// Problems met along the way
    pub failures: Vec<DedupError>,
    /// Whether the steps were only simulated
    pub dry_run: bool,
}

impl PhaseReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// Record and log an action
    pub fn push(&mut self, action: Action) {
        if self.dry_run {
            info!("[dry-run] {}", action);
        } else {
            info!("{}", action);
        }
        self.actions.push(action);
    }

    /// Record and log a failure
    pub fn fail(&mut self, error: DedupError) {
        warn!("{}", error);
        self.failures.push(error);
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of media files deleted, duplicates and residuals alike
    pub fn deleted(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| {
                matches!(
                    a,
                    Action::DeletedDuplicate { .. } | Action::DeletedResidual { .. }
                )
            })
            .count()
    }

    pub fn moved(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, Action::MovedSurvivor { .. }))
            .count()
    }

    pub fn created_dirs(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, Action::CreatedMergeDir { .. }))
            .count()
    }

    /// Number of sidecars that travelled with their media file
    pub fn sidecars(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| match a {
                Action::DeletedDuplicate { sidecar, .. }
                | Action::MovedSurvivor { sidecar, .. }
                | Action::DeletedResidual { sidecar, .. } => *sidecar,
                Action::CreatedMergeDir { .. } => false,
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_lines() {
        let deleted = Action::DeletedDuplicate {
            path: PathBuf::from("Photos from 2020/z.jpg"),
            sidecar: true,
        };
        assert_eq!(
            deleted.to_string(),
            "Deleting duplicate: Photos from 2020/z.jpg (and .json)"
        );

        let moved = Action::MovedSurvivor {
            from: PathBuf::from("A/x.jpg"),
            to: PathBuf::from("A _, B/x.jpg"),
            sidecar: false,
        };
        assert_eq!(moved.to_string(), "Moving A/x.jpg to A _, B/x.jpg");
    }

    #[test]
    fn test_report_counters() {
        let mut report = PhaseReport::new(false);
        report.push(Action::CreatedMergeDir {
            path: PathBuf::from("A _, B"),
        });
        report.push(Action::MovedSurvivor {
            from: PathBuf::from("A/x.jpg"),
            to: PathBuf::from("A _, B/x.jpg"),
            sidecar: true,
        });
        report.push(Action::DeletedResidual {
            path: PathBuf::from("B/x.jpg"),
            sidecar: true,
        });
        report.fail(DedupError::Vanished(PathBuf::from("C/x.jpg")));

        assert_eq!(report.created_dirs(), 1);
        assert_eq!(report.moved(), 1);
        assert_eq!(report.deleted(), 1);
        assert_eq!(report.sidecars(), 2);
        assert!(!report.is_clean());
    }
}
