//! Predicates that restrict enumerated candidates.
//!
//! Collection operations run every walked entry through the operation's
//! [`FilterChain`]; an entry survives only if every filter accepts it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::descriptor::short_type_name;
use crate::store::{EntryKind, FileStore};

/// A walked entry offered to a filter, with read-only store queries.
#[derive(Clone, Copy)]
pub struct Candidate<'a> {
    path: &'a Path,
    store: &'a dyn FileStore,
}

impl<'a> Candidate<'a> {
    /// Wrap a path and the store it lives in.
    #[must_use]
    pub fn new(path: &'a Path, store: &'a dyn FileStore) -> Self {
        Self { path, store }
    }

    /// The candidate path.
    #[must_use]
    pub fn path(&self) -> &'a Path {
        self.path
    }

    /// The final component as UTF-8, if any.
    #[must_use]
    pub fn file_name(&self) -> Option<&'a str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    /// True if the candidate is a directory (following symlinks).
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.store.is_dir(self.path)
    }

    /// True if the candidate is a regular file (following symlinks).
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.store.is_file(self.path)
    }

    /// The entry kind without following a trailing symlink.
    #[must_use]
    pub fn kind(&self) -> Option<EntryKind> {
        self.store.kind(self.path)
    }

    /// True if `name` exists directly below the candidate.
    #[must_use]
    pub fn has_child(&self, name: &str) -> bool {
        self.store.exists(&self.path.join(name))
    }
}

impl fmt::Debug for Candidate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Candidate").field(&self.path).finish()
    }
}

/// A predicate over walked entries.
///
/// Filters that need no configuration should also implement `Default` so
/// they can be declared with `OperationBuilder::filter_default`.
///
/// # Examples
///
/// ```
/// use dirbind::filter::{Candidate, PathFilter};
///
/// #[derive(Default)]
/// struct HasPomXml;
///
/// impl PathFilter for HasPomXml {
///     fn accept(&self, candidate: &Candidate<'_>) -> bool {
///         candidate.has_child("pom.xml")
///     }
/// }
/// ```
pub trait PathFilter: Send + Sync {
    /// Returns true to keep the candidate.
    fn accept(&self, candidate: &Candidate<'_>) -> bool;

    /// Human-readable name used in signatures and diagnostics.
    fn describe(&self) -> String {
        short_type_name(std::any::type_name::<Self>())
    }
}

/// Ordered, AND-combined list of filters.
#[derive(Clone, Default)]
pub struct FilterChain {
    filters: Vec<Arc<dyn PathFilter>>,
}

impl FilterChain {
    /// An empty chain, which accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter; it runs after all filters already present.
    pub fn push(&mut self, filter: Arc<dyn PathFilter>) {
        self.filters.push(filter);
    }

    /// True if no filters are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Number of filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Names of the filters in declaration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.filters.iter().map(|f| f.describe()).collect()
    }

    /// True if every filter accepts `path`. Stops at the first rejection.
    #[must_use]
    pub fn accepts(&self, path: &Path, store: &dyn FileStore) -> bool {
        let candidate = Candidate::new(path, store);
        self.filters.iter().all(|filter| filter.accept(&candidate))
    }
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Keeps directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsDirectory;

impl PathFilter for IsDirectory {
    fn accept(&self, candidate: &Candidate<'_>) -> bool {
        candidate.is_dir()
    }
}

/// Keeps regular files.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsFile;

impl PathFilter for IsFile {
    fn accept(&self, candidate: &Candidate<'_>) -> bool {
        candidate.is_file()
    }
}

/// Drops entries whose name starts with a dot.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotHidden;

impl PathFilter for NotHidden {
    fn accept(&self, candidate: &Candidate<'_>) -> bool {
        !candidate.file_name().is_some_and(|name| name.starts_with('.'))
    }
}

/// Keeps entries that contain a direct child with the given name.
#[derive(Debug, Clone)]
pub struct HasChild {
    name: String,
}

impl HasChild {
    /// Require a child called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl PathFilter for HasChild {
    fn accept(&self, candidate: &Candidate<'_>) -> bool {
        candidate.has_child(&self.name)
    }

    fn describe(&self) -> String {
        format!("HasChild({})", self.name)
    }
}

/// Keeps entries whose file name matches a glob pattern.
#[derive(Debug, Clone)]
pub struct NameGlob {
    pattern: glob::Pattern,
}

impl NameGlob {
    /// Compile `pattern`.
    ///
    /// # Errors
    ///
    /// Returns the glob error if the pattern is malformed.
    pub fn new(pattern: &str) -> Result<Self, glob::PatternError> {
        Ok(Self {
            pattern: glob::Pattern::new(pattern)?,
        })
    }
}

impl PathFilter for NameGlob {
    fn accept(&self, candidate: &Candidate<'_>) -> bool {
        candidate
            .file_name()
            .is_some_and(|name| self.pattern.matches(name))
    }

    fn describe(&self) -> String {
        format!("NameGlob({})", self.pattern.as_str())
    }
}

/// Keeps entries with the given extension (without the dot).
#[derive(Debug, Clone)]
pub struct Extension {
    extension: String,
}

impl Extension {
    /// Require extension `ext`; a leading dot is ignored.
    #[must_use]
    pub fn new(ext: &str) -> Self {
        Self {
            extension: ext.trim_start_matches('.').to_string(),
        }
    }
}

impl PathFilter for Extension {
    fn accept(&self, candidate: &Candidate<'_>) -> bool {
        candidate
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == self.extension)
    }

    fn describe(&self) -> String {
        format!("Extension({})", self.extension)
    }
}
