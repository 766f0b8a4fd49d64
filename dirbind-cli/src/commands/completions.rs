//! Shell completion generation command.

use crate::cli::Cli;
use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io;

const BIN_NAME: &str = "dirbind";

/// Generate shell completion scripts.
#[derive(Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if !global.quiet {
            print_installation_instructions(self.shell);
        }
        generate(self.shell, &mut Cli::command(), BIN_NAME, &mut io::stdout());
        Ok(())
    }
}

fn print_installation_instructions(shell: Shell) {
    let hint = match shell {
        Shell::Bash => "dirbind completions bash > ~/.local/share/bash-completion/completions/dirbind",
        Shell::Zsh => "dirbind completions zsh > ~/.zfunc/_dirbind",
        Shell::Fish => "dirbind completions fish > ~/.config/fish/completions/dirbind.fish",
        Shell::PowerShell => "dirbind completions powershell >> $PROFILE",
        Shell::Elvish => "dirbind completions elvish >> ~/.config/elvish/rc.elv",
        _ => "redirect the output to your shell's completion directory",
    };
    eprintln!("# To install, run:");
    eprintln!("#   {hint}");
}
