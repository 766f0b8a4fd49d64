//! Environment variable overrides for layouts.

use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::layout::schema::LayoutConfig;

/// Names an explicit layout file, bypassing discovery.
pub const LAYOUT_ENV: &str = "DIRBIND_LAYOUT";

/// Overrides the layout's root contract.
pub const ROOT_CONTRACT_ENV: &str = "DIRBIND_ROOT_CONTRACT";

/// Reads `DIRBIND_*` environment variables.
///
/// # Examples
///
/// ```no_run
/// use dirbind::layout::{LayoutEnvironment, LayoutConfig};
///
/// let mut layout = LayoutConfig::default();
/// LayoutEnvironment::apply_overrides(&mut layout).unwrap();
/// ```
pub struct LayoutEnvironment;

impl LayoutEnvironment {
    /// The layout file named by `DIRBIND_LAYOUT`, if set and non-empty.
    #[must_use]
    pub fn layout_file() -> Option<PathBuf> {
        env::var_os(LAYOUT_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    }

    /// Apply `DIRBIND_ROOT_CONTRACT` to `layout`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the variable is set but blank.
    pub fn apply_overrides(layout: &mut LayoutConfig) -> Result<()> {
        if let Ok(root) = env::var(ROOT_CONTRACT_ENV) {
            let root = root.trim();
            if root.is_empty() {
                return Err(Error::Validation {
                    field: ROOT_CONTRACT_ENV.into(),
                    message: "Cannot be empty or only whitespace".into(),
                });
            }
            layout.root = Some(root.to_string());
        }
        Ok(())
    }
}
