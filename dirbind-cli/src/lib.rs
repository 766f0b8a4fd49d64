//! Library exports for dirbind-cli.
//!
//! Exposes the CLI structure so completions and documentation can be
//! generated from the same definitions the binary uses.

pub mod cli;
pub mod commands;
pub mod error;
pub mod utils;

pub use cli::Cli;
