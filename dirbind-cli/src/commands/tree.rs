//! Command to walk the root directory.

use crate::error::CliError;
use crate::utils::{path_json, print_json, print_lines, resolve_root, GlobalOptions, OutputFormat};
use clap::Args;
use dirbind::filter::{Candidate, IsFile, PathFilter};
use dirbind::{FileStore, LocalStore, WalkBounds, Walker};
use std::path::PathBuf;
use std::sync::Arc;

/// Walk the root directory in sorted pre-order.
///
/// Depths are counted from the root (depth 0) and both bounds are
/// inclusive; `-1` leaves the maximum unbounded.
#[derive(Args)]
pub struct TreeCommand {
    /// Minimum depth to report
    #[arg(long, value_name = "N", default_value_t = 1, allow_negative_numbers = true)]
    pub min_depth: i64,

    /// Maximum depth to report (-1 for unbounded)
    #[arg(long, value_name = "N", default_value_t = -1, allow_negative_numbers = true)]
    pub max_depth: i64,

    /// Only report regular files
    #[arg(long)]
    pub files_only: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,
}

impl TreeCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let bounds = WalkBounds::from_raw(self.min_depth, self.max_depth)
            .map_err(CliError::InvalidArguments)?;
        let root = resolve_root(global)?;
        log::debug!("walking {} with bounds {bounds}", root.display());

        let store: Arc<dyn FileStore> = Arc::new(LocalStore::new());
        let mut entries: Vec<PathBuf> = Vec::new();
        for entry in Walker::new(Arc::clone(&store), root, bounds) {
            let path = entry?;
            if self.files_only && !IsFile.accept(&Candidate::new(&path, store.as_ref())) {
                continue;
            }
            entries.push(path);
        }

        match self.format {
            OutputFormat::Plain => print_lines(entries.iter().map(|p| p.display())),
            OutputFormat::Json => print_json(&serde_json::Value::Array(
                entries.iter().map(|p| path_json(p)).collect(),
            )),
        }
    }
}
