//! Main entry point for the dirbind CLI.
//!
//! The `dirbind` command loads a YAML layout and navigates a directory
//! tree through it:
//! - `resolve`: Evaluate an operation chain from the root contract
//! - `tree`: Walk the root directory within depth bounds
//! - `describe`: List the operations of the layout's contracts
//! - `check`: Load and validate the layout
//! - `completions`: Generate shell completion scripts

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    dirbind::init_logger(cli.verbose, cli.quiet).install();

    let global = GlobalOptions {
        quiet: cli.quiet,
        layout: cli.layout,
        root: cli.root,
        contract: cli.contract,
    };

    let result = match cli.command {
        cli::Command::Resolve(cmd) => cmd.execute(&global),
        cli::Command::Tree(cmd) => cmd.execute(&global),
        cli::Command::Describe(cmd) => cmd.execute(&global),
        cli::Command::Check(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
