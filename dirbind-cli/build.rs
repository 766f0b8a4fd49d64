//! Build script for dirbind-cli.
//!
//! Generates the man page at build time using clap_mangen. The page is
//! placed in OUT_DIR for inclusion in release builds.
//!
//! Build scripts cannot depend on the crate being built, so the command
//! structure is restated here.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// Keep this synchronized with src/cli.rs.
fn build_cli() -> Command {
    Command::new("dirbind")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Navigate directory trees through dirbind layouts")
        .long_about(
            "Load a YAML layout of directory contracts and resolve, walk or describe a tree through it",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("layout")
                .long("layout")
                .help("Layout file to use instead of the nearest dirbind.yaml")
                .value_name("FILE")
                .global(true)
                .env("DIRBIND_LAYOUT"),
        )
        .arg(
            Arg::new("root")
                .long("root")
                .help("Directory the root contract is bound to")
                .value_name("DIR")
                .global(true),
        )
        .arg(
            Arg::new("contract")
                .long("contract")
                .help("Override the layout's root contract")
                .value_name("NAME")
                .global(true)
                .env("DIRBIND_ROOT_CONTRACT"),
        )
        .subcommands(vec![
            Command::new("resolve")
                .about("Evaluate an operation chain from the root contract")
                .long_about("Evaluate a dotted chain such as src.main.java or src.file(docs/readme.md)"),
            Command::new("tree")
                .about("Walk the root directory within depth bounds")
                .long_about("List entries below the root in sorted pre-order, bounded by --min-depth and --max-depth"),
            Command::new("describe")
                .about("List contract operations and their metadata")
                .long_about("Print the signature, target, creation action, walk bounds and filters of each operation"),
            Command::new("check")
                .about("Load and validate the layout")
                .long_about("Load the layout, validate every contract reference and report the result"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, elvish or PowerShell"),
        ])
}

fn main() -> std::io::Result<()> {
    let out_dir = PathBuf::from(
        std::env::var_os("OUT_DIR").ok_or_else(|| std::io::Error::other("OUT_DIR is not set"))?,
    );
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;

    let mut buffer = Vec::new();
    Man::new(build_cli()).render(&mut buffer)?;
    fs::write(man_dir.join("dirbind.1"), buffer)?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
    Ok(())
}
