//! Filesystem utilities for atomic container writes.
//!
//! A write goes through a [`StagedFile`]: the bytes land in a sibling temp
//! file which is synced to disk, then [`StagedFile::commit`] renames it over
//! the destination. Until the rename, the previous file is untouched, so a
//! crash at any point leaves either the old or the new container, never a
//! mix. An uncommitted stage removes its temp file when dropped, unless the
//! commit failed after the destination was moved aside.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Suffix of in-flight temp files.
pub const TEMP_SUFFIX: &str = "tmp";

/// Suffix of a destination moved aside during a fallback rename.
pub const BACKUP_SUFFIX: &str = "bak";

/// Atomically rename a file, with fallback for platforms where rename fails if target exists.
///
/// On some platforms (notably Windows), `fs::rename` fails if the destination already exists.
/// In that case the existing file is renamed to a sibling backup, the temp file is renamed
/// into place and the backup is removed. The destination is never deleted: if the second
/// rename fails the backup is moved back, and if that fails too it stays on disk and its
/// path is named in the error.
///
/// # Errors
///
/// Returns an error if the rename fails even after the fallback attempt.
pub fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    rename_with(temp_path, destination, |from, to| fs::rename(from, to))
}

fn rename_with<F>(temp_path: &Path, destination: &Path, rename: F) -> io::Result<()>
where
    F: Fn(&Path, &Path) -> io::Result<()>,
{
    let initial_err = match rename(temp_path, destination) {
        Ok(()) => return Ok(()),
        Err(err) => err,
    };
    if !destination.is_file() {
        return Err(initial_err);
    }

    let backup = sibling_path(destination, BACKUP_SUFFIX)?;
    rename(destination, &backup).map_err(|aside_err| {
        io::Error::new(
            aside_err.kind(),
            format!(
                "Atomic rename failed (initial: {}, move aside: {})",
                initial_err, aside_err
            ),
        )
    })?;

    match rename(temp_path, destination) {
        Ok(()) => {
            let _ = fs::remove_file(&backup);
            Ok(())
        }
        Err(retry_err) => {
            let restored = match rename(&backup, destination) {
                Ok(()) => String::new(),
                Err(_) => format!("; previous file kept at {}", backup.display()),
            };
            Err(io::Error::new(
                retry_err.kind(),
                format!(
                    "Atomic rename failed (initial: {}, retry: {}){}",
                    initial_err, retry_err, restored
                ),
            ))
        }
    }
}

/// Bytes written and synced to a temp file, waiting to replace `destination`.
#[derive(Debug)]
pub struct StagedFile {
    temp_path: PathBuf,
    destination: PathBuf,
    keep_temp: bool,
}

impl StagedFile {
    /// Write `data` to a fresh temp file next to `destination` and fsync it.
    pub fn write(destination: &Path, data: &[u8]) -> io::Result<Self> {
        let temp_path = sibling_path(destination, TEMP_SUFFIX)?;
        let mut file = create_private(&temp_path)?;
        let stage = Self {
            temp_path,
            destination: destination.to_path_buf(),
            keep_temp: false,
        };

        // On error, dropping `stage` removes the partial temp file.
        file.write_all(data)?;
        file.sync_all()?;

        Ok(stage)
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Replace the destination with the staged bytes.
    ///
    /// If the commit fails and no file is left at the destination, the temp
    /// file is kept and its path is part of the error.
    pub fn commit(self) -> io::Result<()> {
        self.commit_with(|from, to| fs::rename(from, to))
    }

    fn commit_with<F>(mut self, rename: F) -> io::Result<()>
    where
        F: Fn(&Path, &Path) -> io::Result<()>,
    {
        if let Err(err) = rename_with(&self.temp_path, &self.destination, rename) {
            if !self.destination.exists() && self.temp_path.exists() {
                self.keep_temp = true;
                return Err(io::Error::new(
                    err.kind(),
                    format!("{}; new contents kept at {}", err, self.temp_path.display()),
                ));
            }
            return Err(err);
        }
        sync_parent_dir(&self.destination);
        Ok(())
    }

    /// Move the staged bytes to the destination only if nothing is there yet.
    ///
    /// Fails with `AlreadyExists` instead of replacing a file that appeared
    /// after the stage was written.
    pub fn commit_new(self) -> io::Result<()> {
        fs::hard_link(&self.temp_path, &self.destination)?;
        sync_parent_dir(&self.destination);
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.keep_temp {
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}

/// Stage and commit in one step.
pub fn write_atomic(destination: &Path, data: &[u8]) -> io::Result<()> {
    StagedFile::write(destination, data)?.commit()
}

fn sibling_path(destination: &Path, suffix: &str) -> io::Result<PathBuf> {
    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let filename = destination
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Invalid vault filename"))?;
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| io::Error::other(format!("System time error: {}", e)))?
        .as_nanos();
    Ok(parent.join(format!(
        ".{}.{}.{}.{}",
        filename,
        std::process::id(),
        nanos,
        suffix
    )))
}

#[cfg(unix)]
fn create_private(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn create_private(path: &Path) -> io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}

#[cfg(unix)]
fn sync_parent_dir(path: &Path) {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn leftover_temps(dir: &Path) -> usize {
        leftovers(dir, ".tmp").len()
    }

    fn leftovers(dir: &Path, suffix: &str) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(suffix))
            .map(|entry| entry.path())
            .collect()
    }

    /// Rename that refuses to replace an existing target, like Windows.
    fn no_replace(from: &Path, to: &Path) -> io::Result<()> {
        if to.exists() {
            return Err(io::Error::new(io::ErrorKind::AlreadyExists, "target exists"));
        }
        fs::rename(from, to)
    }

    #[test]
    fn test_rename_new_file() {
        let dir = tempdir().unwrap();
        let temp = dir.path().join("temp.txt");
        let dest = dir.path().join("dest.txt");

        File::create(&temp).unwrap().write_all(b"test").unwrap();

        rename_with_fallback(&temp, &dest).unwrap();

        assert!(!temp.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "test");
    }

    #[test]
    fn test_rename_overwrites_existing() {
        let dir = tempdir().unwrap();
        let temp = dir.path().join("temp.txt");
        let dest = dir.path().join("dest.txt");

        File::create(&dest).unwrap().write_all(b"old").unwrap();
        File::create(&temp).unwrap().write_all(b"new").unwrap();

        rename_with_fallback(&temp, &dest).unwrap();

        assert!(!temp.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
    }

    #[test]
    fn test_fallback_moves_destination_aside() {
        let dir = tempdir().unwrap();
        let temp = dir.path().join("temp.txt");
        let dest = dir.path().join("dest.txt");
        fs::write(&dest, b"old").unwrap();
        fs::write(&temp, b"new").unwrap();

        rename_with(&temp, &dest, no_replace).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"new");
        assert!(!temp.exists());
        assert!(leftovers(dir.path(), ".bak").is_empty());
    }

    #[test]
    fn test_failed_retry_restores_destination() {
        let dir = tempdir().unwrap();
        let temp = dir.path().join("temp.txt");
        let dest = dir.path().join("dest.txt");
        fs::write(&dest, b"old").unwrap();
        fs::write(&temp, b"new").unwrap();

        let stuck_temp = temp.clone();
        let result = rename_with(&temp, &dest, |from, to| {
            if from == stuck_temp {
                return Err(io::Error::other("temp is stuck"));
            }
            fs::rename(from, to)
        });

        assert!(result.is_err());
        assert_eq!(fs::read(&dest).unwrap(), b"old");
        assert_eq!(fs::read(&temp).unwrap(), b"new");
        assert!(leftovers(dir.path(), ".bak").is_empty());
    }

    #[test]
    fn test_failed_commit_keeps_a_valid_copy() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("vault.pvlt");
        write_atomic(&dest, b"original").unwrap();

        // Everything after moving the destination aside fails.
        let stage = StagedFile::write(&dest, b"replacement").unwrap();
        let temp = stage.temp_path().to_path_buf();
        let moved = std::cell::Cell::new(false);
        let err = stage
            .commit_with(|from, to| {
                if !moved.get() && from.ends_with("vault.pvlt") {
                    moved.set(true);
                    return fs::rename(from, to);
                }
                Err(io::Error::other("disk detached"))
            })
            .unwrap_err();

        assert!(!dest.exists());
        let backups = leftovers(dir.path(), ".bak");
        assert_eq!(backups.len(), 1);
        assert_eq!(fs::read(&backups[0]).unwrap(), b"original");
        assert_eq!(fs::read(&temp).unwrap(), b"replacement");

        let message = err.to_string();
        assert!(message.contains(&backups[0].display().to_string()));
        assert!(message.contains(&temp.display().to_string()));
    }

    #[test]
    fn test_commit_new_refuses_existing_destination() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("vault.pvlt");

        StagedFile::write(&dest, b"first").unwrap().commit_new().unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"first");
        assert_eq!(leftover_temps(dir.path()), 0);

        let err = StagedFile::write(&dest, b"second")
            .unwrap()
            .commit_new()
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&dest).unwrap(), b"first");
        assert_eq!(leftover_temps(dir.path()), 0);
    }

    #[test]
    fn test_write_atomic_replaces_and_cleans_up() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("vault.pvlt");

        write_atomic(&dest, b"first").unwrap();
        write_atomic(&dest, b"second").unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"second");
        assert_eq!(leftover_temps(dir.path()), 0);
    }

    #[test]
    fn test_uncommitted_stage_leaves_destination_and_removes_temp() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("vault.pvlt");
        write_atomic(&dest, b"original").unwrap();

        let stage = StagedFile::write(&dest, b"replacement").unwrap();
        assert!(stage.temp_path().exists());
        assert_eq!(stage.destination(), dest.as_path());
        drop(stage);

        assert_eq!(fs::read(&dest).unwrap(), b"original");
        assert_eq!(leftover_temps(dir.path()), 0);
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("missing").join("vault.pvlt");

        assert!(write_atomic(&dest, b"data").is_err());
        assert!(!dest.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_written_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let dest = dir.path().join("vault.pvlt");
        write_atomic(&dest, b"secret").unwrap();

        let mode = fs::metadata(&dest).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
