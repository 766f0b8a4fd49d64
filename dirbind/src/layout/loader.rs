//! Layout file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::layout::schema::LayoutConfig;

/// File name searched for by [`LayoutLoader::discover`].
pub const LAYOUT_FILE_NAME: &str = "dirbind.yaml";

/// A loaded layout and where it came from.
#[derive(Debug, Clone)]
pub struct LayoutSource {
    /// Path of the layout file.
    pub path: PathBuf,
    /// Parsed layout.
    pub config: LayoutConfig,
}

/// Loads layout files.
///
/// # Examples
///
/// ```no_run
/// use dirbind::layout::LayoutLoader;
/// use std::path::Path;
///
/// if let Some(source) = LayoutLoader::discover(Path::new(".")).unwrap() {
///     println!("using {}", source.path.display());
/// }
/// ```
pub struct LayoutLoader;

impl LayoutLoader {
    /// Walk up from `start_dir` and load the first `dirbind.yaml` found.
    ///
    /// # Errors
    ///
    /// Returns an error if a discovered file cannot be read or parsed.
    pub fn discover(start_dir: &Path) -> Result<Option<LayoutSource>> {
        let mut current = start_dir.to_path_buf();
        loop {
            let candidate = current.join(LAYOUT_FILE_NAME);
            if candidate.is_file() {
                log::debug!("discovered layout {}", candidate.display());
                let config = Self::load_file(&candidate)?;
                return Ok(Some(LayoutSource {
                    path: candidate,
                    config,
                }));
            }
            if !current.pop() {
                return Ok(None);
            }
        }
    }

    /// Load and parse a layout file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the YAML is invalid.
    pub fn load_file(path: &Path) -> Result<LayoutConfig> {
        let contents = fs::read_to_string(path).map_err(|e| Error::InvalidPath {
            path: path.to_path_buf(),
            reason: format!("Failed to read layout file: {e}"),
        })?;

        serde_yaml::from_str(&contents).map_err(|e| Error::Validation {
            field: format!("{}", path.display()),
            message: format!("Invalid YAML: {e}"),
        })
    }
}
