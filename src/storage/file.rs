//! Raw text file access.
//!
//! [`JsonProvider`](super::json::JsonProvider) only needs two primitives:
//! read a whole file as text, and replace a whole file with new text.
//! Keeping them behind a trait lets tests run without touching disk.

use std::collections::HashMap;
use std::fs;
use std::io::{Error as IoError, ErrorKind, Result as IoResult, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use tempfile::NamedTempFile;

/// Whole-file text access by path.
pub trait FileSystem: Send + Sync {
    /// Read the full contents of `path`.
    ///
    /// # Errors
    /// `ErrorKind::NotFound` if the file does not exist, or any other I/O error.
    fn read_to_string(&self, path: &Path) -> IoResult<String>;

    /// Replace the full contents of `path` with `contents`.
    fn write(&self, path: &Path, contents: &str) -> IoResult<()>;
}

/// [`FileSystem`] backed by `std::fs`.
///
/// Writes go to a temporary file in the target's directory which is then
/// renamed over the target, so readers see either the old or the new
/// contents and a failed write leaves the old file in place. Symlinks are
/// resolved first so the link survives and its target is updated, and an
/// existing file keeps its permissions.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn read_to_string(&self, path: &Path) -> IoResult<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> IoResult<()> {
        let target = match fs::canonicalize(path) {
            Ok(resolved) => resolved,
            Err(e) if e.kind() == ErrorKind::NotFound => path.to_path_buf(),
            Err(e) => return Err(e),
        };

        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        match fs::metadata(&target) {
            Ok(meta) => tmp.as_file().set_permissions(meta.permissions())?,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target).map_err(|e| e.error)?;
        Ok(())
    }
}

/// [`FileSystem`] held entirely in memory.
///
/// Useful for tests: contents can be inspected directly and writes can be
/// made to fail on demand.
#[derive(Debug, Default)]
pub struct InMemoryFileSystem {
    files: RwLock<HashMap<PathBuf, String>>,
    fail_writes: AtomicBool,
}

impl InMemoryFileSystem {
    /// Create an empty file system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a file system holding one file.
    #[must_use]
    pub fn with_file(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        let fs = Self::new();
        if let Ok(mut files) = fs.files.write() {
            files.insert(path.into(), contents.into());
        }
        fs
    }

    /// Returns the current contents of `path`, if it exists.
    #[must_use]
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.read().ok()?.get(path.as_ref()).cloned()
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

fn poisoned() -> IoError {
    IoError::new(ErrorKind::Other, "poisoned lock: in-memory file system")
}

impl FileSystem for InMemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> IoResult<String> {
        let files = self.files.read().map_err(|_| poisoned())?;
        files.get(path).cloned().ok_or_else(|| {
            IoError::new(ErrorKind::NotFound, format!("{} not found", path.display()))
        })
    }

    fn write(&self, path: &Path, contents: &str) -> IoResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(IoError::new(ErrorKind::Other, "simulated write failure"));
        }
        let mut files = self.files.write().map_err(|_| poisoned())?;
        files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn std_write_creates_parents_and_replaces() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("list.json");

        StdFileSystem.write(&path, "[1]").unwrap();
        assert_eq!(StdFileSystem.read_to_string(&path).unwrap(), "[1]");

        StdFileSystem.write(&path, "[]").unwrap();
        assert_eq!(StdFileSystem.read_to_string(&path).unwrap(), "[]");

        // Only the target remains; the temp file was renamed over it.
        let entries = fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[cfg(unix)]
    #[test]
    fn std_write_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("shared.json");
        fs::write(&path, "[]").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        StdFileSystem.write(&path, "[1]").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
        assert_eq!(StdFileSystem.read_to_string(&path).unwrap(), "[1]");
    }

    #[cfg(unix)]
    #[test]
    fn std_write_through_symlink_updates_target() {
        let dir = tempdir().unwrap();
        let real = dir.path().join("real.json");
        let link = dir.path().join("link.json");
        fs::write(&real, "[]").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        StdFileSystem.write(&link, r#"[{"id":1}]"#).unwrap();

        assert_eq!(fs::read_to_string(&real).unwrap(), r#"[{"id":1}]"#);
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    }

    #[test]
    fn std_read_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let err = StdFileSystem
            .read_to_string(&dir.path().join("missing.json"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn in_memory_round_trip_and_failure_switch() {
        let fs = InMemoryFileSystem::with_file("a.json", "[]");
        assert_eq!(fs.read_to_string(Path::new("a.json")).unwrap(), "[]");
        assert_eq!(
            fs.read_to_string(Path::new("b.json")).unwrap_err().kind(),
            ErrorKind::NotFound
        );

        fs.set_fail_writes(true);
        assert!(fs.write(Path::new("a.json"), "[1]").is_err());
        assert_eq!(fs.contents("a.json").as_deref(), Some("[]"));

        fs.set_fail_writes(false);
        fs.write(Path::new("a.json"), "[1]").unwrap();
        assert_eq!(fs.contents("a.json").as_deref(), Some("[1]"));
    }
}
