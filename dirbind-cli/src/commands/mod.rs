//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `resolve`: Evaluate an operation chain from the root contract
//! - `tree`: Walk the root directory within depth bounds
//! - `describe`: List contract operations and their metadata
//! - `check`: Load and validate the layout
//! - `completions`: Generate shell completion scripts

pub mod check;
pub mod completions;
pub mod describe;
pub mod resolve;
pub mod tree;

pub use check::CheckCommand;
pub use completions::CompletionsCommand;
pub use describe::DescribeCommand;
pub use resolve::ResolveCommand;
pub use tree::TreeCommand;
