//! Structural path helpers.
//!
//! Bindings navigate purely structurally: descending joins segments onto
//! the anchor, ascending strips trailing segments, and walk depth is the
//! component distance from the walk root. None of these helpers touch the
//! filesystem.
//!
//! # Examples
//!
//! ```
//! use dirbind::path::{ascend, depth_below};
//! use std::path::Path;
//!
//! let anchor = Path::new("/repo/module/src/main");
//! assert_eq!(ascend(anchor, 2).unwrap(), Path::new("/repo/module"));
//! assert_eq!(depth_below(Path::new("/repo"), anchor), Some(3));
//! ```

pub mod normalize;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

use std::path::{Component, Path, PathBuf};

/// Remove `depth` trailing segments from `anchor`.
///
/// Returns `None` when the anchor has fewer than `depth` segments to give
/// up (ascending from `/` or from a single relative segment).
#[must_use]
pub fn ascend(anchor: &Path, depth: usize) -> Option<PathBuf> {
    anchor
        .ancestors()
        .nth(depth)
        .filter(|ancestor| !ancestor.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

/// Component distance of `path` below `root`.
///
/// `root` itself has depth 0. Returns `None` if `path` is not under `root`.
#[must_use]
pub fn depth_below(root: &Path, path: &Path) -> Option<usize> {
    path.strip_prefix(root)
        .ok()
        .map(|relative| relative.components().count())
}

/// Check that `subpath` can be joined onto an anchor as an explicit child.
///
/// # Errors
///
/// Returns a description of the problem if `subpath` is empty or absolute.
pub fn check_subpath(subpath: &str) -> std::result::Result<(), String> {
    if subpath.trim().is_empty() {
        return Err("subpath must not be empty".to_string());
    }
    let path = Path::new(subpath);
    if path.is_absolute()
        || path
            .components()
            .any(|c| matches!(c, Component::RootDir | Component::Prefix(_)))
    {
        return Err(format!("subpath '{subpath}' must be relative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascend_one_level() {
        assert_eq!(ascend(Path::new("/a/b/c"), 1), Some(PathBuf::from("/a/b")));
    }

    #[test]
    fn test_ascend_zero_is_identity() {
        assert_eq!(ascend(Path::new("/a/b"), 0), Some(PathBuf::from("/a/b")));
    }

    #[test]
    fn test_ascend_to_root() {
        assert_eq!(ascend(Path::new("/a"), 1), Some(PathBuf::from("/")));
    }

    #[test]
    fn test_ascend_past_root() {
        assert_eq!(ascend(Path::new("/a"), 2), None);
        assert_eq!(ascend(Path::new("/"), 1), None);
    }

    #[test]
    fn test_ascend_relative_single_segment() {
        assert_eq!(ascend(Path::new("a"), 1), None);
        assert_eq!(ascend(Path::new("a/b"), 1), Some(PathBuf::from("a")));
    }

    #[test]
    fn test_depth_below() {
        let root = Path::new("/r");
        assert_eq!(depth_below(root, Path::new("/r")), Some(0));
        assert_eq!(depth_below(root, Path::new("/r/a")), Some(1));
        assert_eq!(depth_below(root, Path::new("/r/a/b/c")), Some(3));
        assert_eq!(depth_below(root, Path::new("/other")), None);
    }

    #[test]
    fn test_check_subpath() {
        assert!(check_subpath("pom.xml").is_ok());
        assert!(check_subpath("main/java").is_ok());
        assert!(check_subpath("").is_err());
        assert!(check_subpath("   ").is_err());
        assert!(check_subpath("/etc").is_err());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn segments_strategy() -> impl Strategy<Value = Vec<String>> {
            prop::collection::vec("[a-zA-Z0-9_-]{1,10}", 1..=6)
        }

        proptest! {
            /// Descending then ascending the same number of levels is the identity.
            #[test]
            fn ascend_inverts_join(base in segments_strategy(), extra in segments_strategy()) {
                let anchor = PathBuf::from(format!("/{}", base.join("/")));
                let mut child = anchor.clone();
                for segment in &extra {
                    child.push(segment);
                }
                prop_assert_eq!(ascend(&child, extra.len()), Some(anchor));
            }

            /// Depth below a root equals the number of joined segments.
            #[test]
            fn depth_counts_segments(base in segments_strategy(), extra in segments_strategy()) {
                let root = PathBuf::from(format!("/{}", base.join("/")));
                let child = root.join(extra.join("/"));
                prop_assert_eq!(depth_below(&root, &child), Some(extra.len()));
            }
        }
    }
}
