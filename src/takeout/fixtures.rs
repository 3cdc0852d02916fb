//! Temporary takeout trees for tests

use super::fs::{FileSystem, LocalFs};
use super::sidecar::sidecar_path;
use crate::core::error::{DedupError, Result};
use crate::duplicate::{ContentHasher, FileDigest, Md5Digest};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct Takeout {
    dir: TempDir,
}

impl Takeout {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, album: &str, name: &str) -> PathBuf {
        self.root().join(album).join(name)
    }

    /// Write `album/name`, creating the album directory if needed
    pub fn file(&self, album: &str, name: &str, content: &[u8]) -> PathBuf {
        let dir = self.root().join(album);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Write the `.json` sidecar of `album/name`
    pub fn sidecar(&self, album: &str, name: &str) -> PathBuf {
        let path = sidecar_path(&self.path(album, name), ".json");
        fs::write(&path, b"{}").unwrap();
        path
    }

    pub fn exists(&self, album: &str, name: &str) -> bool {
        self.path(album, name).exists()
    }

    pub fn has_sidecar(&self, album: &str, name: &str) -> bool {
        sidecar_path(&self.path(album, name), ".json").exists()
    }

    /// Sorted file names directly inside `album`
    pub fn listing(&self, album: &str) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.root().join(album))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

fn denied() -> io::Error {
    io::Error::new(io::ErrorKind::PermissionDenied, "read-only")
}

/// The real file system, except that chosen paths cannot be deleted or moved
#[derive(Default)]
pub struct FailingFs {
    pub fail_remove: Vec<PathBuf>,
    /// Sources whose rename fails
    pub fail_rename: Vec<PathBuf>,
}

impl FileSystem for FailingFs {
    fn exists(&self, path: &Path) -> bool {
        LocalFs.exists(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        if self.fail_remove.iter().any(|p| p == path) {
            return Err(denied());
        }
        LocalFs.remove_file(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        if self.fail_rename.iter().any(|p| p == from) {
            return Err(denied());
        }
        LocalFs.rename(from, to)
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        LocalFs.create_dir(path)
    }

    fn create_marker(&self, path: &Path) -> io::Result<()> {
        LocalFs.create_marker(path)
    }
}

/// Hashes like [`ContentHasher`] but cannot read the chosen paths
pub struct FailingHasher {
    pub unreadable: Vec<PathBuf>,
}

impl FileDigest for FailingHasher {
    fn digest(&self, path: &Path) -> Result<Md5Digest> {
        if self.unreadable.iter().any(|p| p == path) {
            return Err(DedupError::Hash {
                path: path.to_path_buf(),
                source: denied(),
            });
        }
        ContentHasher::new().hash_file(path)
    }
}
