//! Command to load and validate the layout.

use crate::error::CliError;
use crate::utils::{load_layout, GlobalOptions};
use clap::Args;

/// Load the layout, validate it and build its catalog.
#[derive(Args)]
pub struct CheckCommand {}

impl CheckCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let loaded = match load_layout(global) {
            Ok(loaded) => loaded,
            Err(e) => {
                if !global.quiet {
                    eprintln!("Layout is invalid");
                }
                return Err(e);
            }
        };
        let catalog = loaded.catalog()?;

        if !global.quiet {
            let source = loaded
                .source
                .as_ref()
                .map_or_else(|| "<inline>".to_string(), |p| p.display().to_string());
            println!(
                "Layout is valid: {source} ({} contract(s), root '{}')",
                catalog.contract_names().count(),
                catalog.root_name()
            );
        }
        Ok(())
    }
}
