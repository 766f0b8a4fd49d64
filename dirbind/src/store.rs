//! The filesystem capability every binding resolves against.
//!
//! The resolver, walk engine and filters never touch `std::fs` directly;
//! they go through a [`FileStore`]. [`LocalStore`] is the only shipped
//! implementation.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

/// The kind of an entry, as seen without following a trailing symlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
    /// A symbolic link (not followed).
    Symlink,
    /// Anything else (sockets, devices, ...).
    Other,
}

/// Synchronous access to a local file store.
///
/// Implementations must be usable from several threads at once; bindings
/// share a store through `Arc<dyn FileStore>`.
#[cfg_attr(test, mockall::automock)]
pub trait FileStore: Send + Sync {
    /// Returns the kind of the entry at `path`, or `None` if nothing is there.
    fn kind(&self, path: &Path) -> Option<EntryKind>;

    /// Returns true if `path` exists (following symlinks).
    fn exists(&self, path: &Path) -> bool;

    /// Returns true if `path` is a directory (following symlinks).
    fn is_dir(&self, path: &Path) -> bool;

    /// Returns true if `path` is a regular file (following symlinks).
    fn is_file(&self, path: &Path) -> bool;

    /// Lists the direct children of the directory at `path`, in no
    /// particular order.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a readable directory.
    fn list_children(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Creates a single directory; the parent must already exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent is missing, the entry already exists,
    /// or the store denies the operation.
    fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Creates a directory and every missing ancestor.
    ///
    /// # Errors
    ///
    /// Returns an error if any level cannot be created.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Removes `path` and everything below it.
    ///
    /// # Errors
    ///
    /// Returns an error if any entry cannot be removed.
    fn remove_all(&self, path: &Path) -> io::Result<()>;
}

/// [`FileStore`] backed by the local filesystem through `std::fs`.
///
/// # Examples
///
/// ```
/// use dirbind::{FileStore, LocalStore};
///
/// let dir = tempfile::tempdir().unwrap();
/// let store = LocalStore::new();
/// store.create_dir_all(&dir.path().join("a/b")).unwrap();
/// assert!(store.is_dir(&dir.path().join("a/b")));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

impl LocalStore {
    /// Create a new local store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FileStore for LocalStore {
    fn kind(&self, path: &Path) -> Option<EntryKind> {
        let metadata = fs::symlink_metadata(path).ok()?;
        let file_type = metadata.file_type();
        Some(if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn list_children(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect()
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn remove_all(&self, path: &Path) -> io::Result<()> {
        match self.kind(path) {
            None => Ok(()),
            Some(EntryKind::Directory) => fs::remove_dir_all(path),
            Some(_) => fs::remove_file(path),
        }
        .or_else(|e| {
            // Vanished concurrently; nothing left to delete.
            if e.kind() == ErrorKind::NotFound {
                Ok(())
            } else {
                Err(e)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_kind_reports_entries() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let store = LocalStore::new();
        assert_eq!(store.kind(dir.path()), Some(EntryKind::Directory));
        assert_eq!(store.kind(&file), Some(EntryKind::File));
        assert_eq!(store.kind(&dir.path().join("missing")), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_kind_does_not_follow_symlinks() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let target = dir.path().join("target");
        let link = dir.path().join("link");
        fs::create_dir(&target).unwrap();
        symlink(&target, &link).unwrap();

        let store = LocalStore::new();
        assert_eq!(store.kind(&link), Some(EntryKind::Symlink));
        assert!(store.is_dir(&link));
    }

    #[test]
    fn test_list_children() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();

        let mut children = LocalStore::new().list_children(dir.path()).unwrap();
        children.sort();
        assert_eq!(children, vec![dir.path().join("a"), dir.path().join("b.txt")]);
    }

    #[test]
    fn test_list_children_of_missing_dir_fails() {
        let dir = tempdir().unwrap();
        let err = LocalStore::new()
            .list_children(&dir.path().join("missing"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_create_dir_requires_parent() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new();
        assert!(store.create_dir(&dir.path().join("x/y")).is_err());
        store.create_dir_all(&dir.path().join("x/y")).unwrap();
        assert!(store.is_dir(&dir.path().join("x/y")));
    }

    #[test]
    fn test_remove_all_is_idempotent() {
        let dir = tempdir().unwrap();
        let tree = dir.path().join("tree");
        fs::create_dir_all(tree.join("a/b")).unwrap();
        fs::write(tree.join("a/b/c.txt"), "c").unwrap();

        let store = LocalStore::new();
        store.remove_all(&tree).unwrap();
        assert!(!tree.exists());
        store.remove_all(&tree).unwrap();
    }
}
