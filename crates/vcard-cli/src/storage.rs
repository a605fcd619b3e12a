//! Source-file storage clients.
//!
//! A [`StorageClient`] turns the batch's file path into a local readable file
//! and releases it afterwards. [`DownloadedFile`] ties the two together: it
//! downloads on construction and cleans up when dropped, so the release
//! happens exactly once whichever way the batch ends.

use std::fs;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised by storage clients.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("source file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("source path escapes the storage root: {path}")]
    OutsideRoot { path: PathBuf },

    #[error("storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Contract for fetching the batch input.
pub trait StorageClient {
    /// Makes `path` available locally and returns the local path.
    fn download(&self, path: &Path) -> Result<PathBuf>;

    /// Releases a path previously returned by [`StorageClient::download`].
    fn cleanup(&self, local: &Path) -> Result<()>;
}

/// Resolves `path` beneath `root`, rejecting `..` components.
fn resolve(root: Option<&Path>, path: &Path) -> Result<PathBuf> {
    let Some(root) = root else {
        return Ok(path.to_path_buf());
    };
    let outside = || StorageError::OutsideRoot {
        path: path.to_path_buf(),
    };
    if path
        .components()
        .any(|component| matches!(component, Component::ParentDir))
    {
        return Err(outside());
    }
    if path.is_absolute() {
        if path.starts_with(root) {
            return Ok(path.to_path_buf());
        }
        return Err(outside());
    }
    Ok(root.join(path))
}

fn existing(path: PathBuf) -> Result<PathBuf> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(StorageError::NotFound { path })
    }
}

/// Reads the source in place. Cleanup never deletes the caller's file.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    root: Option<PathBuf>,
}

impl LocalStorage {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }
}

impl StorageClient for LocalStorage {
    fn download(&self, path: &Path) -> Result<PathBuf> {
        existing(resolve(self.root.as_deref(), path)?)
    }

    fn cleanup(&self, local: &Path) -> Result<()> {
        debug!(path = %local.display(), "local source left in place");
        Ok(())
    }
}

/// Copies the source into a private temporary file and deletes the copy on
/// cleanup.
#[derive(Debug, Clone, Default)]
pub struct StagedStorage {
    root: Option<PathBuf>,
}

impl StagedStorage {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }
}

impl StorageClient for StagedStorage {
    fn download(&self, path: &Path) -> Result<PathBuf> {
        let source = existing(resolve(self.root.as_deref(), path)?)?;
        // The extension selects the reader, so the copy keeps it.
        let suffix = source
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let io_err = |source: std::io::Error| StorageError::Io {
            path: path.to_path_buf(),
            source,
        };
        let staged = tempfile::Builder::new()
            .prefix("vcard-batch-")
            .suffix(&suffix)
            .tempfile()
            .map_err(io_err)?;
        fs::copy(&source, staged.path()).map_err(io_err)?;
        let (_, local) = staged.keep().map_err(|err| io_err(err.error))?;
        debug!(source = %source.display(), local = %local.display(), "staged source file");
        Ok(local)
    }

    fn cleanup(&self, local: &Path) -> Result<()> {
        fs::remove_file(local).map_err(|source| StorageError::Io {
            path: local.to_path_buf(),
            source,
        })?;
        debug!(path = %local.display(), "removed staged file");
        Ok(())
    }
}

/// A downloaded source file, released on drop.
pub struct DownloadedFile<'c> {
    client: &'c dyn StorageClient,
    path: PathBuf,
}

impl<'c> DownloadedFile<'c> {
    pub fn acquire(client: &'c dyn StorageClient, source: &Path) -> Result<Self> {
        let path = client.download(source)?;
        Ok(Self { client, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DownloadedFile<'_> {
    fn drop(&mut self) {
        if let Err(error) = self.client.cleanup(&self.path) {
            warn!(%error, "failed to clean up source file");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use tempfile::TempDir;

    use super::*;

    #[derive(Default)]
    struct CountingStorage {
        cleanups: RefCell<Vec<PathBuf>>,
    }

    impl StorageClient for CountingStorage {
        fn download(&self, path: &Path) -> Result<PathBuf> {
            Ok(path.to_path_buf())
        }

        fn cleanup(&self, local: &Path) -> Result<()> {
            self.cleanups.borrow_mut().push(local.to_path_buf());
            Ok(())
        }
    }

    #[test]
    fn guard_cleans_up_once() {
        let storage = CountingStorage::default();
        {
            let file = DownloadedFile::acquire(&storage, Path::new("a.csv")).unwrap();
            assert_eq!(file.path(), Path::new("a.csv"));
        }
        assert_eq!(*storage.cleanups.borrow(), vec![PathBuf::from("a.csv")]);
    }

    #[test]
    fn local_storage_keeps_the_source() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("contacts.csv"), "Nombre\nAna\n").unwrap();
        let storage = LocalStorage::new(Some(dir.path().to_path_buf()));
        {
            let file = DownloadedFile::acquire(&storage, Path::new("contacts.csv")).unwrap();
            assert_eq!(file.path(), dir.path().join("contacts.csv"));
        }
        assert!(dir.path().join("contacts.csv").exists());
    }

    #[test]
    fn staged_storage_removes_the_copy() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("contacts.csv");
        fs::write(&source, "Nombre\nAna\n").unwrap();
        let storage = StagedStorage::new(None);

        let local = {
            let file = DownloadedFile::acquire(&storage, &source).unwrap();
            assert_ne!(file.path(), source);
            assert_eq!(file.path().extension().unwrap(), "csv");
            assert_eq!(fs::read_to_string(file.path()).unwrap(), "Nombre\nAna\n");
            file.path().to_path_buf()
        };
        assert!(!local.exists());
        assert!(source.exists());
    }

    #[test]
    fn root_rejects_escaping_paths() {
        let root = Path::new("/data/uploads");
        assert!(matches!(
            resolve(Some(root), Path::new("../etc/passwd")),
            Err(StorageError::OutsideRoot { .. })
        ));
        assert!(matches!(
            resolve(Some(root), Path::new("/tmp/other.csv")),
            Err(StorageError::OutsideRoot { .. })
        ));
        assert!(matches!(
            resolve(Some(root), Path::new("/data/uploads/../../etc/passwd")),
            Err(StorageError::OutsideRoot { .. })
        ));
        assert_eq!(
            resolve(Some(root), Path::new("/data/uploads/b1/contacts.csv")).unwrap(),
            root.join("b1/contacts.csv")
        );
        assert_eq!(
            resolve(Some(root), Path::new("b1/contacts.csv")).unwrap(),
            root.join("b1/contacts.csv")
        );
    }

    #[test]
    fn missing_source_is_not_found() {
        let storage = LocalStorage::default();
        assert!(matches!(
            storage.download(Path::new("/nonexistent/contacts.csv")),
            Err(StorageError::NotFound { .. })
        ));
    }
}
