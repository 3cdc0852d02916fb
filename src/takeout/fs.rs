//! Filesystem operations used by the destructive phases
//!
//! The purge and merge phases only touch the disk through [`FileSystem`], so
//! a dry run can walk exactly the same code path as a real one.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The filesystem primitives the purge and merge phases need
pub trait FileSystem {
    /// Whether something exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Delete a file
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Move a file
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Create a single directory (the parent must exist)
    fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Create an empty file
    fn create_marker(&self, path: &Path) -> io::Result<()>;

    /// Whether operations are only being simulated
    fn is_dry_run(&self) -> bool {
        false
    }
}

/// The real local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(path)
    }

    fn create_marker(&self, path: &Path) -> io::Result<()> {
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map(|_| ())
    }
}

/// Simulates operations without touching the disk
///
/// Paths "removed" or "created" earlier in the run are remembered so later
/// existence checks agree with what a real run would see.
#[derive(Debug, Default)]
pub struct DryRunFs {
    created: RefCell<HashSet<PathBuf>>,
    removed: RefCell<HashSet<PathBuf>>,
}

impl DryRunFs {
    pub fn new() -> Self {
        Self::default()
    }

    fn mark_created(&self, path: &Path) {
        self.removed.borrow_mut().remove(path);
        self.created.borrow_mut().insert(path.to_path_buf());
    }

    fn mark_removed(&self, path: &Path) {
        self.created.borrow_mut().remove(path);
        self.removed.borrow_mut().insert(path.to_path_buf());
    }

    fn not_found(path: &Path) -> io::Error {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )
    }
}

impl FileSystem for DryRunFs {
    fn exists(&self, path: &Path) -> bool {
        if self.removed.borrow().contains(path) {
            return false;
        }
        self.created.borrow().contains(path) || path.exists()
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        if !self.exists(path) {
            return Err(Self::not_found(path));
        }
        self.mark_removed(path);
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        if !self.exists(from) {
            return Err(Self::not_found(from));
        }
        self.mark_removed(from);
        self.mark_created(to);
        Ok(())
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        if self.exists(path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", path.display()),
            ));
        }
        self.mark_created(path);
        Ok(())
    }

    fn create_marker(&self, path: &Path) -> io::Result<()> {
        self.mark_created(path);
        Ok(())
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}
