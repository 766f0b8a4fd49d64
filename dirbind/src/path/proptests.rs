//! Property-based tests for path helpers.
//!
//! The inline tests in `path` cover ascension against joins; this module
//! stresses the helpers with larger case counts and relative inputs.

use super::normalize::resolve_components;
use super::{ascend, check_subpath, depth_below};
use proptest::prelude::*;
use std::path::PathBuf;

fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_.-]{1,12}".prop_filter("dot segments", |s| s != "." && s != "..")
}

fn absolute_path_strategy() -> impl Strategy<Value = PathBuf> {
    prop::collection::vec(segment_strategy(), 0..8).prop_map(|parts| {
        let mut path = PathBuf::from("/");
        for part in parts {
            path.push(part);
        }
        path
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 5000,
        .. ProptestConfig::default()
    })]

    // Ascending one level never yields a deeper path.
    #[test]
    fn ascend_shortens(path in absolute_path_strategy()) {
        if let Some(parent) = ascend(&path, 1) {
            prop_assert!(path.starts_with(&parent));
            prop_assert_eq!(depth_below(&parent, &path), Some(1));
        } else {
            prop_assert_eq!(path, PathBuf::from("/"));
        }
    }

    // Ascension composes: up(a) then up(b) equals up(a + b).
    #[test]
    fn ascend_composes(path in absolute_path_strategy(), a in 0usize..4, b in 0usize..4) {
        let stepwise = ascend(&path, a).and_then(|p| ascend(&p, b));
        prop_assert_eq!(stepwise, ascend(&path, a + b));
    }

    // Plain segments are always acceptable subpaths.
    #[test]
    fn plain_segments_are_valid_subpaths(segment in segment_strategy()) {
        prop_assert!(check_subpath(&segment).is_ok());
    }

    // Component resolution leaves clean absolute paths untouched.
    #[test]
    fn resolve_components_fixed_point(path in absolute_path_strategy()) {
        prop_assert_eq!(resolve_components(&path).unwrap(), path);
    }
}
