//! Metadata sidecars
//!
//! A takeout export stores the metadata of `IMG_0001.jpg` next to it as
//! `IMG_0001.jpg.json`. Sidecars are never hashed and are moved or deleted
//! together with their media file whenever they exist.

use super::fs::FileSystem;
use crate::core::error::{DedupError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Path of the sidecar belonging to `media`
pub fn sidecar_path(media: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(media.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Whether a file name is a sidecar rather than media
pub fn is_sidecar(file_name: &str, suffix: &str) -> bool {
    !suffix.is_empty() && file_name.ends_with(suffix)
}

/// Delete the sidecar of `media` if there is one
///
/// Returns whether a sidecar was removed.
pub fn remove_sidecar<F>(fs: &F, media: &Path, suffix: &str) -> Result<bool>
where
    F: FileSystem + ?Sized,
{
    let sidecar = sidecar_path(media, suffix);
    if !fs.exists(&sidecar) {
        return Ok(false);
    }

    fs.remove_file(&sidecar)
        .map_err(|source| DedupError::Remove {
            path: sidecar,
            source,
        })?;
    Ok(true)
}

/// Move the sidecar of `from` next to `to` if there is one
///
/// Returns whether a sidecar was moved.
pub fn move_sidecar<F: FileSystem + ?Sized>(
    fs: &F,
    from: &Path,
    to: &Path,
    suffix: &str,
) -> Result<bool> {
    let source_sidecar = sidecar_path(from, suffix);
    if !fs.exists(&source_sidecar) {
        return Ok(false);
    }

    let target_sidecar = sidecar_path(to, suffix);
    fs.rename(&source_sidecar, &target_sidecar)
        .map_err(|source| DedupError::Move {
            from: source_sidecar,
            to: target_sidecar,
            source,
        })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::takeout::fs::LocalFs;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_sidecar_path() {
        assert_eq!(
            sidecar_path(Path::new("Trip/IMG_0001.jpg"), ".json"),
            PathBuf::from("Trip/IMG_0001.jpg.json")
        );
    }

    #[test]
    fn test_is_sidecar() {
        assert!(is_sidecar("IMG_0001.jpg.json", ".json"));
        assert!(is_sidecar("metadata.json", ".json"));
        assert!(!is_sidecar("IMG_0001.jpg", ".json"));
        assert!(!is_sidecar("IMG_0001.jpg", ""));
    }

    #[test]
    fn test_remove_sidecar_only_when_present() {
        let temp_dir = TempDir::new().unwrap();
        let media = temp_dir.path().join("a.jpg");
        fs::write(&media, b"a").unwrap();

        // no sidecar is not an error
        assert!(!remove_sidecar(&LocalFs, &media, ".json").unwrap());

        fs::write(sidecar_path(&media, ".json"), b"{}").unwrap();
        assert!(remove_sidecar(&LocalFs, &media, ".json").unwrap());
        assert!(!sidecar_path(&media, ".json").exists());
        assert!(media.exists());
    }

    #[test]
    fn test_move_sidecar() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("a.jpg");
        let to = temp_dir.path().join("b.jpg");
        fs::write(sidecar_path(&from, ".json"), b"{}").unwrap();

        assert!(move_sidecar(&LocalFs, &from, &to, ".json").unwrap());
        assert!(sidecar_path(&to, ".json").exists());
        assert!(!move_sidecar(&LocalFs, &from, &to, ".json").unwrap());
    }
}
