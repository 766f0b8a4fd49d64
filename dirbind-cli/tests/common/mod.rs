//! Common test utilities for CLI integration tests.
//!
//! Provides an isolated directory tree with a `dirbind.yaml` layout and a
//! command builder that clears the dirbind environment variables.

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Layout used by most CLI tests.
pub const BUILD_LAYOUT: &str = r"
root: project
contracts:
  project:
    description: Multi-module build
    operations:
      - name: modules
        returns: module
        collection: array
        filters: [is_dir, { has_child: pom.xml }]
      - { name: app, returns: module }
      - name: sources
        collection: sequence
        walk: { min_depth: 1, max_depth: -1 }
        filters: [{ glob: '*.java' }]
  module:
    operations:
      - { name: pom_xml, path: pom.xml, must_exist: true }
      - { name: java, path: src/main/java, create: recursive }
      - { name: project, ascend: 1, returns: project }
      - { name: file, argument: true }
";

/// Test environment with an isolated directory tree.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create an empty test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        Self {
            temp_dir,
            temp_path,
        }
    }

    /// Create a build tree with `BUILD_LAYOUT` at its root:
    ///
    /// ```text
    /// dirbind.yaml
    /// app/pom.xml
    /// app/src/main/java/App.java
    /// lib/pom.xml
    /// docs/guide.md
    /// ```
    pub fn with_build_tree() -> Self {
        let env = Self::new();
        env.write_file("dirbind.yaml", BUILD_LAYOUT);
        env.write_file("app/pom.xml", "<project/>");
        env.write_file("app/src/main/java/App.java", "class App {}");
        env.write_file("lib/pom.xml", "<project/>");
        env.write_file("docs/guide.md", "# Guide");
        env
    }

    /// Get a bare command builder with the dirbind environment cleared.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("dirbind").expect("Failed to find dirbind binary");
        cmd.env_remove("DIRBIND_LAYOUT")
            .env_remove("DIRBIND_ROOT_CONTRACT")
            .env_remove("DIRBIND_LOG_MODE");
        cmd
    }

    /// Get a command builder rooted at this environment.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--root").arg(&self.temp_path);
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Write a file, creating missing parents.
    pub fn write_file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.temp_path.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, contents).expect("Failed to write test file");
        path
    }
}

/// Lines of stdout for a successful run.
#[allow(dead_code)]
pub fn stdout_lines(output: &std::process::Output) -> Vec<String> {
    String::from_utf8(output.stdout.clone())
        .expect("stdout is not UTF-8")
        .lines()
        .map(str::to_string)
        .collect()
}
