//! Atomic write primitives
//!
//! Content is staged in a hidden temp file beside the target and renamed into place, so a
//! reader never observes a half-written document.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Outcome of an exclusive create.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ExclusiveWrite {
    Written,
    AlreadyExists,
}

/// Replace `target` with `content`, overwriting any previous file.
pub(crate) fn atomic_write(target: &Path, content: &[u8]) -> io::Result<()> {
    let temp_path = temp_path_for(target);
    if let Err(err) = stage(&temp_path, content).and_then(|_| fs::rename(&temp_path, target)) {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }
    Ok(())
}

/// Write `content` to `target` only if nothing exists there yet.
///
/// The name is claimed with `create_new`, then the staged content is renamed over the claim.
/// On any failure after the claim both files are removed.
pub(crate) fn create_exclusive(target: &Path, content: &[u8]) -> io::Result<ExclusiveWrite> {
    match OpenOptions::new().write(true).create_new(true).open(target) {
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
            return Ok(ExclusiveWrite::AlreadyExists)
        }
        Err(err) => return Err(err),
    }

    let temp_path = temp_path_for(target);
    if let Err(err) = stage(&temp_path, content).and_then(|_| fs::rename(&temp_path, target)) {
        let _ = fs::remove_file(&temp_path);
        let _ = fs::remove_file(target);
        return Err(err);
    }
    Ok(ExclusiveWrite::Written)
}

fn stage(temp_path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = File::create(temp_path)?;
    file.write_all(content)?;
    file.sync_all()
}

fn temp_path_for(target: &Path) -> PathBuf {
    let file_name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let token = Uuid::new_v4().simple().to_string();
    target.with_file_name(format!(".{file_name}.{}.tmp", &token[..8]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tmp_files(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .map(|s| s.ends_with(".tmp"))
                    .unwrap_or(false)
            })
            .count()
    }

    #[test]
    fn atomic_write_replaces_existing_content() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("Draft1.md");
        fs::write(&target, b"old draft").unwrap();

        atomic_write(&target, b"new draft").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"new draft");
        assert_eq!(tmp_files(dir.path()), 0);
    }

    #[test]
    fn atomic_write_into_missing_directory_leaves_nothing_behind() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("missing").join("Draft1.md");

        assert!(atomic_write(&target, b"content").is_err());
        assert!(!target.exists());
    }

    #[test]
    fn create_exclusive_writes_new_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("SUNN2025V01ABCD.md");

        let outcome = create_exclusive(&target, b"# Lease\n").unwrap();

        assert_eq!(outcome, ExclusiveWrite::Written);
        assert_eq!(fs::read(&target).unwrap(), b"# Lease\n");
        assert_eq!(tmp_files(dir.path()), 0);
    }

    #[test]
    fn create_exclusive_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("SUNN2025V01ABCD.md");
        fs::write(&target, b"original").unwrap();

        let outcome = create_exclusive(&target, b"replacement").unwrap();

        assert_eq!(outcome, ExclusiveWrite::AlreadyExists);
        assert_eq!(fs::read(&target).unwrap(), b"original");
    }
}
