//! Handler for the `completions` command.

use clap::{CommandFactory, ValueEnum};
use clap_complete::{Shell, generate};
use colored::*;
use std::io::stdout;
use std::path::Path;

use bazelfmt_lib::exit_codes::exit;

/// Print a completion script for `shell`, or for the shell in `$SHELL`.
pub fn handle_completions(shell: Option<Shell>, list: bool) {
    if list {
        println!("Available shells:");
        for shell in Shell::value_variants() {
            println!("  {shell}");
        }
        return;
    }

    let Some(shell) = shell.or_else(|| std::env::var("SHELL").ok().and_then(|s| shell_from_path(&s))) else {
        eprintln!(
            "{}: Could not detect shell from $SHELL; pass one explicitly, e.g. `bazelfmt completions zsh`",
            "Error".red().bold()
        );
        exit::tool_error();
    };

    generate(shell, &mut crate::Cli::command(), "bazelfmt", &mut stdout());
}

fn shell_from_path(shell_path: &str) -> Option<Shell> {
    match Path::new(shell_path).file_name()?.to_str()? {
        "bash" => Some(Shell::Bash),
        "zsh" => Some(Shell::Zsh),
        "fish" => Some(Shell::Fish),
        "pwsh" | "powershell" => Some(Shell::PowerShell),
        "elvish" => Some(Shell::Elvish),
        _ => None,
    }
}
