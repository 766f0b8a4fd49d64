//! Common test utilities for integration tests.
//!
//! This module provides a tree fixture builder and the contracts shared by
//! the scenario tests.

pub mod contracts;

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Builder for temporary directory trees.
///
/// # Examples
///
/// ```no_run
/// # use common::TreeFixture;
/// let tree = TreeFixture::new()
///     .dir("app/src/main/java")
///     .file("app/pom.xml", "<project/>")
///     .build();
/// ```
#[allow(dead_code)]
pub struct TreeFixture {
    dirs: Vec<String>,
    files: Vec<(String, String)>,
}

#[allow(dead_code)]
impl TreeFixture {
    /// Creates an empty fixture.
    pub fn new() -> Self {
        Self {
            dirs: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Adds a directory (and its ancestors).
    pub fn dir(mut self, relative: &str) -> Self {
        self.dirs.push(relative.to_string());
        self
    }

    /// Adds a file with contents; missing parents are created.
    pub fn file(mut self, relative: &str, contents: &str) -> Self {
        self.files.push((relative.to_string(), contents.to_string()));
        self
    }

    /// Materializes the tree in a fresh temporary directory.
    pub fn build(self) -> TempDir {
        let temp = tempfile::tempdir().unwrap();
        for dir in &self.dirs {
            fs::create_dir_all(temp.path().join(dir)).unwrap();
        }
        for (file, contents) in &self.files {
            let path = temp.path().join(file);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, contents).unwrap();
        }
        temp
    }
}

/// Paths below `root`, relative and with `/` separators.
#[allow(dead_code)]
pub fn relative(root: &Path, paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| {
            p.strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace(std::path::MAIN_SEPARATOR, "/")
        })
        .collect()
}
