//! Bounded, deterministic subtree enumeration.
//!
//! A [`Walker`] visits the subtree below a root in pre-order, children
//! sorted by name, and yields every entry whose depth lies within its
//! [`WalkBounds`]. The root has depth 0, its children depth 1, and so on.
//! Traversal stops descending once `max_depth` is reached; entries
//! shallower than `min_depth` are still traversed but never yielded.
//!
//! # Examples
//!
//! ```
//! use dirbind::{LocalStore, WalkBounds, Walker};
//! use std::sync::Arc;
//!
//! let dir = tempfile::tempdir().unwrap();
//! std::fs::create_dir_all(dir.path().join("a/b/c")).unwrap();
//!
//! let found: Vec<_> = Walker::new(Arc::new(LocalStore), dir.path(), WalkBounds::between(2, 2))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(found, vec![dir.path().join("a/b")]);
//! ```

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::store::{EntryKind, FileStore};

/// Inclusive depth range for a walk. `max_depth = None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WalkBounds {
    min_depth: usize,
    max_depth: Option<usize>,
}

impl Default for WalkBounds {
    /// Direct children only.
    fn default() -> Self {
        Self::children()
    }
}

impl WalkBounds {
    /// Bounds with an explicit minimum and optional maximum depth.
    #[must_use]
    pub const fn new(min_depth: usize, max_depth: Option<usize>) -> Self {
        Self {
            min_depth,
            max_depth,
        }
    }

    /// Direct children of the root, nothing else.
    #[must_use]
    pub const fn children() -> Self {
        Self::new(1, Some(1))
    }

    /// Exactly the entries with `min_depth <= depth <= max_depth`.
    #[must_use]
    pub const fn between(min_depth: usize, max_depth: usize) -> Self {
        Self::new(min_depth, Some(max_depth))
    }

    /// Everything at `min_depth` or deeper.
    #[must_use]
    pub const fn min(min_depth: usize) -> Self {
        Self::new(min_depth, None)
    }

    /// The root and everything down to `max_depth`.
    #[must_use]
    pub const fn max(max_depth: usize) -> Self {
        Self::new(0, Some(max_depth))
    }

    /// The root and the entire subtree.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self::new(0, None)
    }

    /// Build bounds from signed values where `-1` means unbounded.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if either value is below its
    /// allowed minimum or the range is inverted.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirbind::WalkBounds;
    ///
    /// assert_eq!(WalkBounds::from_raw(2, -1).unwrap(), WalkBounds::min(2));
    /// assert!(WalkBounds::from_raw(3, 1).is_err());
    /// ```
    pub fn from_raw(min_depth: i64, max_depth: i64) -> std::result::Result<Self, String> {
        let min = usize::try_from(min_depth)
            .map_err(|_| format!("min_depth must be >= 0, got {min_depth}"))?;
        let max = match max_depth {
            -1 => None,
            m => Some(
                usize::try_from(m)
                    .map_err(|_| format!("max_depth must be >= 0 or -1, got {m}"))?,
            ),
        };
        if let Some(max) = max {
            if max < min {
                return Err(format!("max_depth {max} is below min_depth {min}"));
            }
        }
        Ok(Self::new(min, max))
    }

    /// The minimum yielded depth.
    #[must_use]
    pub const fn min_depth(&self) -> usize {
        self.min_depth
    }

    /// The maximum yielded depth, `None` when unbounded.
    #[must_use]
    pub const fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// True if an entry at `depth` is yielded.
    #[must_use]
    pub fn contains(&self, depth: usize) -> bool {
        depth >= self.min_depth && self.max_depth.map_or(true, |max| depth <= max)
    }

    /// True if children of an entry at `depth` may still be yielded.
    fn descends_from(&self, depth: usize) -> bool {
        self.max_depth.map_or(true, |max| depth < max)
    }
}

impl fmt::Display for WalkBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max_depth {
            Some(max) => write!(f, "{}..={max}", self.min_depth),
            None => write!(f, "{}..", self.min_depth),
        }
    }
}

/// Lazy pre-order enumeration of a subtree.
///
/// Each `Walker` is a fresh, forward-only traversal. Directory listings
/// happen on demand, so dropping a walker early skips the rest of the tree.
/// Symlinked directories below the root are yielded but not descended.
pub struct Walker {
    store: Arc<dyn FileStore>,
    root: PathBuf,
    bounds: WalkBounds,
    stack: Vec<(PathBuf, usize)>,
    started: bool,
}

impl fmt::Debug for Walker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Walker")
            .field("root", &self.root)
            .field("bounds", &self.bounds)
            .field("pending", &self.stack.len())
            .finish_non_exhaustive()
    }
}

impl Walker {
    /// Create a walker rooted at `root`. No I/O happens until iteration.
    #[must_use]
    pub fn new(store: Arc<dyn FileStore>, root: impl Into<PathBuf>, bounds: WalkBounds) -> Self {
        Self {
            store,
            root: root.into(),
            bounds,
            stack: Vec::new(),
            started: false,
        }
    }

    /// The walk root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The bounds this walker honors.
    #[must_use]
    pub fn bounds(&self) -> WalkBounds {
        self.bounds
    }

    fn is_traversable(&self, path: &Path, depth: usize) -> bool {
        if depth == 0 {
            self.store.is_dir(path)
        } else {
            self.store.kind(path) == Some(EntryKind::Directory)
        }
    }
}

impl Iterator for Walker {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            if !self.store.exists(&self.root) {
                return Some(Err(Error::WalkFailed {
                    path: self.root.clone(),
                    source: io::Error::new(io::ErrorKind::NotFound, "walk root does not exist"),
                }));
            }
            log::trace!("walking {} within {}", self.root.display(), self.bounds);
            self.stack.push((self.root.clone(), 0));
        }

        while let Some((path, depth)) = self.stack.pop() {
            if self.bounds.descends_from(depth) && self.is_traversable(&path, depth) {
                match self.store.list_children(&path) {
                    Ok(mut children) => {
                        children.sort();
                        self.stack
                            .extend(children.into_iter().rev().map(|child| (child, depth + 1)));
                    }
                    Err(source) => return Some(Err(Error::WalkFailed { path, source })),
                }
            }
            if self.bounds.contains(depth) {
                return Some(Ok(path));
            }
        }
        None
    }
}

/// Collect every entry of a walk.
///
/// # Errors
///
/// Returns the first [`Error::WalkFailed`] encountered.
pub fn walk(store: Arc<dyn FileStore>, root: &Path, bounds: WalkBounds) -> Result<Vec<PathBuf>> {
    Walker::new(store, root, bounds).collect()
}
