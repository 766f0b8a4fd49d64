//! Utility functions for CLI operations.
//!
//! This module provides helpers shared across commands: root resolution,
//! layout loading, and output formatting.

use crate::error::CliError;
use clap::ValueEnum;
use dirbind::layout::LoadedLayout;
use dirbind::path::normalize::normalize;
use dirbind::{Binding, Catalog, LayoutBuilder};
use serde_json::json;
use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Suppress non-essential output.
    pub quiet: bool,

    /// Explicit layout file.
    pub layout: Option<PathBuf>,

    /// Directory the root contract is bound to.
    pub root: Option<PathBuf>,

    /// Root contract override.
    pub contract: Option<String>,
}

/// Output format for commands that print results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One entry per line
    #[default]
    Plain,
    /// Pretty-printed JSON
    Json,
}

/// Resolve the root directory, using CWD if not specified.
///
/// The result is absolute with `~` expanded, but symlinks are not followed,
/// so the directory does not have to exist yet.
pub fn resolve_root(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    let root = match &global.root {
        Some(p) => p.clone(),
        None => env::current_dir()?,
    };
    Ok(normalize(&root)?)
}

/// Load and validate the layout.
///
/// An explicit `--layout` wins; otherwise the nearest `dirbind.yaml` at or
/// above the root is used.
pub fn load_layout(global: &GlobalOptions) -> Result<LoadedLayout, CliError> {
    let root = resolve_root(global)?;
    let mut builder = LayoutBuilder::new().with_working_dir(&root);
    if let Some(file) = &global.layout {
        builder = builder.with_file(&normalize(file)?);
    }
    if let Some(contract) = &global.contract {
        builder = builder.with_root(contract.clone());
    }
    let loaded = builder.build()?;
    if let Some(source) = &loaded.source {
        log::debug!("loaded layout from {}", source.display());
    }
    Ok(loaded)
}

/// Load the layout and build its catalog.
pub fn load_catalog(global: &GlobalOptions) -> Result<Catalog, CliError> {
    Ok(load_layout(global)?.catalog()?)
}

/// Bind the layout's root contract to the root directory.
pub fn root_binding(global: &GlobalOptions) -> Result<Binding, CliError> {
    let root = resolve_root(global)?;
    let catalog = load_catalog(global)?;
    log::debug!(
        "binding contract '{}' to {}",
        catalog.root_name(),
        root.display()
    );
    Ok(catalog.bind_root(root)?)
}

/// JSON form of a path.
pub fn path_json(path: &Path) -> serde_json::Value {
    json!(path.display().to_string())
}

/// JSON form of a binding.
pub fn binding_json(binding: &Binding) -> serde_json::Value {
    json!({
        "contract": binding.contract_name(),
        "path": binding.anchor().display().to_string(),
    })
}

/// Pretty-print `value` to stdout.
pub fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value)?;
    writeln!(handle)?;
    Ok(())
}

/// Print one line per entry to stdout.
pub fn print_lines<I>(lines: I) -> Result<(), CliError>
where
    I: IntoIterator,
    I::Item: std::fmt::Display,
{
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for line in lines {
        writeln!(handle, "{line}")?;
    }
    Ok(())
}
