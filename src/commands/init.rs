//! Handler for the `init` command.

use bazelfmt_lib::config::CONFIG_FILE;
use bazelfmt_lib::exit_codes::exit;
use bazelfmt_lib::init::create_default_config;
use colored::*;
use std::path::Path;

/// Write a default `.bazelfmt.toml` into the current directory.
pub fn handle_init() {
    match create_default_config(Path::new(CONFIG_FILE)) {
        Ok(true) => println!("Created default configuration file: {CONFIG_FILE}"),
        Ok(false) => {
            eprintln!("{}: {CONFIG_FILE} already exists", "Error".red().bold());
            exit::tool_error();
        }
        Err(e) => {
            eprintln!("{}: Failed to create config file: {}", "Error".red().bold(), e);
            exit::tool_error();
        }
    }
}
