//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    CheckCommand, CompletionsCommand, DescribeCommand, ResolveCommand, TreeCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for navigating directory trees through typed layouts.
#[derive(Parser)]
#[command(name = "dirbind")]
#[command(
    version,
    about = "Navigate directory trees through dirbind layouts",
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Layout file to use instead of the nearest dirbind.yaml
    #[arg(long, value_name = "FILE", global = true, env = "DIRBIND_LAYOUT")]
    pub layout: Option<PathBuf>,

    /// Directory the root contract is bound to (defaults to the current directory)
    #[arg(long, value_name = "DIR", global = true)]
    pub root: Option<PathBuf>,

    /// Override the layout's root contract
    #[arg(long, value_name = "NAME", global = true, env = "DIRBIND_ROOT_CONTRACT")]
    pub contract: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Evaluate an operation chain from the root contract
    Resolve(ResolveCommand),

    /// Walk the root directory within depth bounds
    Tree(TreeCommand),

    /// List contract operations and their metadata
    Describe(DescribeCommand),

    /// Load and validate the layout
    Check(CheckCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
