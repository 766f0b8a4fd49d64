//! Assembling a layout from files, environment and overrides.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::layout::catalog::Catalog;
use crate::layout::environment::LayoutEnvironment;
use crate::layout::loader::{LayoutLoader, LAYOUT_FILE_NAME};
use crate::layout::schema::LayoutConfig;
use crate::layout::validator::LayoutValidator;
use crate::path::normalize::normalize;

/// A validated layout and the file it was read from.
#[derive(Debug, Clone)]
pub struct LoadedLayout {
    /// Source file, `None` for programmatic layouts.
    pub source: Option<PathBuf>,
    /// The validated layout.
    pub config: LayoutConfig,
}

impl LoadedLayout {
    /// Build the layout's catalog.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the layout is inconsistent.
    pub fn catalog(&self) -> Result<Catalog> {
        Catalog::from_config(&self.config)
    }
}

/// Builder for loading layouts.
///
/// Sources, highest precedence first:
///
/// 1. A programmatic layout (`with_config`)
/// 2. An explicit file (`with_file`, then `DIRBIND_LAYOUT`)
/// 3. The nearest `dirbind.yaml` at or above the working directory
///
/// The root contract may then be overridden by `DIRBIND_ROOT_CONTRACT` and
/// finally by `with_root`.
///
/// # Examples
///
/// ```
/// use dirbind::{LayoutBuilder, LayoutConfig};
///
/// let layout = LayoutConfig::from_yaml_str("contracts:\n  m: {}\n").unwrap();
/// let loaded = LayoutBuilder::new()
///     .skip_env()
///     .with_config(layout)
///     .with_root("m")
///     .build()
///     .unwrap();
/// assert_eq!(loaded.config.root.as_deref(), Some("m"));
/// ```
#[derive(Debug, Default)]
pub struct LayoutBuilder {
    working_dir: Option<PathBuf>,
    file: Option<PathBuf>,
    config: Option<LayoutConfig>,
    root: Option<String>,
    skip_env: bool,
}

impl LayoutBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start discovery from `dir` instead of the current directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: &Path) -> Self {
        self.working_dir = Some(dir.to_path_buf());
        self
    }

    /// Load this file instead of discovering one.
    #[must_use]
    pub fn with_file(mut self, file: &Path) -> Self {
        self.file = Some(file.to_path_buf());
        self
    }

    /// Use a programmatic layout instead of any file.
    #[must_use]
    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the root contract.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Ignore `DIRBIND_*` environment variables.
    #[must_use]
    pub fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Load, override and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if no layout can be found, a file cannot be read or
    /// parsed, or validation fails.
    pub fn build(self) -> Result<LoadedLayout> {
        let (source, mut config) = self.load()?;

        if !self.skip_env {
            LayoutEnvironment::apply_overrides(&mut config)?;
        }
        if let Some(root) = self.root {
            config.root = Some(root);
        }

        LayoutValidator::validate(&config)?;
        Ok(LoadedLayout { source, config })
    }

    fn load(&self) -> Result<(Option<PathBuf>, LayoutConfig)> {
        if let Some(config) = &self.config {
            return Ok((None, config.clone()));
        }

        let explicit = self.file.clone().or_else(|| {
            if self.skip_env {
                None
            } else {
                LayoutEnvironment::layout_file()
            }
        });
        if let Some(file) = explicit {
            let file = normalize(&file)?;
            let config = LayoutLoader::load_file(&file)?;
            return Ok((Some(file), config));
        }

        let working_dir = match &self.working_dir {
            Some(dir) => dir.clone(),
            None => env::current_dir()?,
        };
        LayoutLoader::discover(&working_dir)?
            .map(|found| (Some(found.path), found.config))
            .ok_or_else(|| Error::Validation {
                field: "layout".into(),
                message: format!(
                    "No {LAYOUT_FILE_NAME} found in {} or any parent directory",
                    working_dir.display()
                ),
            })
    }
}
