//! Read/write capability used by [`TomlFile`](crate::TomlFile).
//!
//! The document handle never touches the filesystem directly. It calls a
//! [`Storage`] implementation, which treats every read and write as a single
//! all-or-nothing operation.
//!
//! # Security
//!
//! [`FsStorage`] rejects files above a hard size limit (10MB by default) and
//! non-UTF8 content.

use dashmap::DashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Default hard limit on file size in bytes (10MB).
///
/// Typical manifests are well under 100KB.
pub const MAX_FILE_SIZE: u64 = 10_000_000;

/// Default threshold above which a read logs a warning (1MB).
pub const LARGE_FILE_THRESHOLD: u64 = 1_000_000;

/// Whole-file read and write.
pub trait Storage {
    /// Read the entire contents of `path` as UTF-8 text.
    fn read_all(&self, path: &Path) -> io::Result<String>;

    /// Replace the contents of `path` with `contents`.
    fn write_all(&self, path: &Path, contents: &str) -> io::Result<()>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn read_all(&self, path: &Path) -> io::Result<String> {
        (**self).read_all(path)
    }

    fn write_all(&self, path: &Path, contents: &str) -> io::Result<()> {
        (**self).write_all(path, contents)
    }
}

/// Filesystem storage.
///
/// Writes go to a temporary file next to the target which is then renamed over
/// it, so an interrupted save leaves the old file in place. Symlinks are
/// followed, so the file they point at is the one replaced.
///
/// # Examples
///
/// ```no_run
/// use update_toml_core::storage::{FsStorage, Storage};
/// use std::path::Path;
///
/// let storage = FsStorage::default();
/// let content = storage.read_all(Path::new("pyproject.toml")).unwrap();
/// println!("Loaded {} bytes", content.len());
/// ```
#[derive(Debug, Clone)]
pub struct FsStorage {
    max_file_size: u64,
    large_file_threshold: u64,
}

impl Default for FsStorage {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
            large_file_threshold: LARGE_FILE_THRESHOLD,
        }
    }
}

impl FsStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the hard size limit and the warning threshold.
    pub fn with_limits(max_file_size: u64, large_file_threshold: u64) -> Self {
        Self {
            max_file_size,
            large_file_threshold,
        }
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    fn check_size(&self, path: &Path) -> io::Result<()> {
        let metadata =
            std::fs::metadata(path).inspect_err(|e| log_io_error("metadata", path, e))?;
        let size = metadata.len();

        if size > self.max_file_size {
            tracing::error!(
                "File exceeds maximum size: {} bytes (limit: {} bytes)",
                size,
                self.max_file_size
            );
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "file too large: {} bytes (max: {} bytes)",
                    size, self.max_file_size
                ),
            ));
        }

        if size > self.large_file_threshold {
            tracing::warn!(
                "File is large: {} bytes for {:?}. Typical manifests are <100KB.",
                size,
                path
            );
        }

        tracing::trace!("File size: {} bytes", size);
        Ok(())
    }
}

impl Storage for FsStorage {
    fn read_all(&self, path: &Path) -> io::Result<String> {
        tracing::debug!("Reading {:?}", path);
        self.check_size(path)?;

        let content =
            std::fs::read_to_string(path).inspect_err(|e| log_io_error("read", path, e))?;

        tracing::debug!("Read {:?} ({} bytes)", path, content.len());
        Ok(content)
    }

    fn write_all(&self, path: &Path, contents: &str) -> io::Result<()> {
        // Rename over the file a symlink points at, not over the link itself.
        let target = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp =
            NamedTempFile::new_in(dir).inspect_err(|e| log_io_error("create", dir, e))?;
        temp.write_all(contents.as_bytes())?;
        temp.as_file().sync_all()?;

        // Keep the target's permissions; the temp file is created 0600.
        if let Ok(metadata) = std::fs::metadata(&target) {
            temp.as_file().set_permissions(metadata.permissions())?;
        }

        temp.persist(&target).map_err(|e| {
            log_io_error("persist", &target, &e.error);
            e.error
        })?;

        tracing::debug!("Wrote {:?} ({} bytes)", path, contents.len());
        Ok(())
    }
}

fn log_io_error(op: &str, path: &Path, e: &io::Error) {
    match e.kind() {
        io::ErrorKind::NotFound => {
            tracing::debug!("File not found during {}: {:?}", op, path);
        }
        io::ErrorKind::PermissionDenied => {
            tracing::warn!("Permission denied during {}: {:?}", op, path);
        }
        _ => {
            tracing::error!("IO error during {} of {:?}: {}", op, path, e);
        }
    }
}

/// In-memory storage keyed by path.
///
/// Used by tests and by callers that hold document text themselves.
///
/// # Examples
///
/// ```
/// use update_toml_core::storage::{MemoryStorage, Storage};
/// use std::path::Path;
///
/// let storage = MemoryStorage::new();
/// storage.insert("pyproject.toml", "[project]\nname = \"demo\"\n");
/// assert!(storage.read_all(Path::new("pyproject.toml")).is_ok());
/// assert!(storage.read_all(Path::new("missing.toml")).is_err());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: DashMap<PathBuf, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `contents` under `path`, replacing any previous contents.
    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into());
    }

    /// Current contents of `path`, if any.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.get(path.as_ref()).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.files.contains_key(path.as_ref())
    }
}

impl Storage for MemoryStorage {
    fn read_all(&self, path: &Path) -> io::Result<String> {
        self.get(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }

    fn write_all(&self, path: &Path, contents: &str) -> io::Result<()> {
        self.insert(path, contents);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_read_existing_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let content = "[project]\nname = \"demo\"\n";
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let loaded = FsStorage::default().read_all(temp_file.path()).unwrap();
        assert_eq!(loaded, content);
    }

    #[test]
    fn test_read_nonexistent_file() {
        let err = FsStorage::default()
            .read_all(Path::new("/nonexistent/file/path.toml"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_read_empty_file() {
        let temp_file = NamedTempFile::new().unwrap();
        let loaded = FsStorage::default().read_all(temp_file.path()).unwrap();
        assert_eq!(loaded, "");
    }

    #[test]
    fn test_read_rejects_oversized_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(&[b'a'; 64]).unwrap();
        temp_file.flush().unwrap();

        let storage = FsStorage::with_limits(32, 16);
        let err = storage.read_all(temp_file.path()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("file too large"));
    }

    #[test]
    fn test_read_rejects_invalid_utf8() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(&[0xFF, 0xFE, 0xFD]).unwrap();
        temp_file.flush().unwrap();

        let err = FsStorage::default().read_all(temp_file.path()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_write_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("new.toml");

        FsStorage::default().write_all(&path, "a = 1\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a = 1\n");
    }

    #[test]
    fn test_write_replaces_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("existing.toml");
        std::fs::write(&path, "a = 1\n").unwrap();

        FsStorage::default().write_all(&path, "a = 2\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a = 2\n");
        // No temp files left behind.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("perm.toml");
        std::fs::write(&path, "a = 1\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        FsStorage::default().write_all(&path, "a = 2\n").unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_through_symlink() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("real.toml");
        let link = dir.path().join("link.toml");
        std::fs::write(&real, "v = \"1\"\n").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        FsStorage::default().write_all(&link, "v = \"2\"\n").unwrap();

        let metadata = std::fs::symlink_metadata(&link).unwrap();
        assert!(metadata.file_type().is_symlink());
        assert_eq!(std::fs::read_to_string(&real).unwrap(), "v = \"2\"\n");
        assert_eq!(std::fs::read_to_string(&link).unwrap(), "v = \"2\"\n");
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.toml");
        assert!(FsStorage::default().write_all(&path, "a = 1\n").is_err());
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert!(!storage.contains("a.toml"));

        storage.write_all(Path::new("a.toml"), "x = 1\n").unwrap();
        assert!(storage.contains("a.toml"));
        assert_eq!(storage.read_all(Path::new("a.toml")).unwrap(), "x = 1\n");
        assert_eq!(storage.get("a.toml").as_deref(), Some("x = 1\n"));

        let err = storage.read_all(Path::new("b.toml")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_storage_by_reference() {
        let storage = MemoryStorage::new();
        storage.insert("a.toml", "x = 1\n");

        fn write_through<S: Storage>(storage: S) {
            storage.write_all(Path::new("a.toml"), "x = 2\n").unwrap();
        }
        write_through(&storage);
        assert_eq!(storage.get("a.toml").as_deref(), Some("x = 2\n"));
    }
}
