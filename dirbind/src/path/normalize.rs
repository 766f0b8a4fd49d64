//! Normalization of user-supplied roots.
//!
//! Bindings keep their anchors exactly as given. Paths that come from a
//! person (CLI `--root`, layout files, environment variables) are first
//! normalized here: `~` is expanded, relative paths are joined onto the
//! current directory and `.`/`..` are folded away. Symlinks are left alone.

use std::env;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Expand a leading `~` to the home directory.
///
/// Only `~` and `~/rest` are understood; `~user` is rejected.
///
/// # Errors
///
/// Returns an error if the path is not valid UTF-8, the home directory is
/// unknown, or `~user` syntax is used.
///
/// # Examples
///
/// ```
/// use dirbind::path::normalize::expand_tilde;
/// use std::path::Path;
///
/// let expanded = expand_tilde(Path::new("~/project")).unwrap();
/// assert!(expanded.is_absolute());
/// assert!(expanded.ends_with("project"));
///
/// assert_eq!(expand_tilde(Path::new("/srv")).unwrap(), Path::new("/srv"));
/// ```
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let text = path.to_str().ok_or_else(|| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: "path is not valid UTF-8".to_string(),
    })?;

    let Some(rest) = text.strip_prefix('~') else {
        return Ok(path.to_path_buf());
    };

    let home = home::home_dir().ok_or_else(|| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: "home directory is unknown".to_string(),
    })?;

    if rest.is_empty() {
        Ok(home)
    } else if let Some(tail) = rest.strip_prefix('/').or_else(|| rest.strip_prefix('\\')) {
        Ok(home.join(tail))
    } else {
        Err(Error::InvalidPath {
            path: path.to_path_buf(),
            reason: "~user syntax is not supported; use ~ or ~/path".to_string(),
        })
    }
}

/// Fold `.` and `..` components of an absolute path.
///
/// # Errors
///
/// Returns an error if `..` would climb above the root.
///
/// # Examples
///
/// ```
/// use dirbind::path::normalize::resolve_components;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(
///     resolve_components(Path::new("/a/./b/../c")).unwrap(),
///     PathBuf::from("/a/c")
/// );
/// ```
pub fn resolve_components(path: &Path) -> Result<PathBuf> {
    let mut result = PathBuf::new();
    let mut rooted = false;

    for component in path.components() {
        match component {
            Component::Prefix(prefix) => {
                result.push(prefix.as_os_str());
                rooted = true;
            }
            Component::RootDir => {
                result.push(component);
                rooted = true;
            }
            Component::Normal(segment) => result.push(segment),
            Component::CurDir => {}
            Component::ParentDir => {
                if !result.pop() {
                    return Err(Error::InvalidPath {
                        path: path.to_path_buf(),
                        reason: "too many '..' components (escapes root)".to_string(),
                    });
                }
            }
        }
    }

    if rooted && result.as_os_str().is_empty() {
        result.push(Component::RootDir);
    }

    Ok(result)
}

/// Normalize a user-supplied path to absolute form.
///
/// # Errors
///
/// Returns an error if tilde expansion fails, the current directory cannot
/// be read, or `..` escapes the root.
///
/// # Examples
///
/// ```
/// use dirbind::path::normalize::normalize;
/// use std::path::Path;
///
/// assert!(normalize(Path::new("./src")).unwrap().is_absolute());
/// ```
pub fn normalize(path: &Path) -> Result<PathBuf> {
    let expanded = expand_tilde(path)?;

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        let cwd = env::current_dir().map_err(|e| Error::InvalidPath {
            path: path.to_path_buf(),
            reason: format!("cannot read current directory: {e}"),
        })?;
        cwd.join(expanded)
    };

    resolve_components(&absolute)
}
