//! Handler for the `config` command.

use bazelfmt_lib::config::{ConfigOverrides, ConfigSource};
use bazelfmt_lib::exit_codes::exit;
use colored::*;

use crate::cli_utils::load_config_with_cli_error_handling;

/// Print the effective configuration as TOML, prefixed with where it came from.
pub fn handle_config(config_path: Option<&str>, no_config: bool) {
    let loaded = load_config_with_cli_error_handling(config_path, no_config, &ConfigOverrides::default());

    let rendered = match loaded.config.to_toml_string() {
        Ok(text) => text,
        Err(e) => {
            eprintln!("{}: {}", "Config error".red().bold(), e);
            exit::tool_error();
        }
    };

    match &loaded.source {
        ConfigSource::File(path) => println!("# Loaded from {}", path.display()),
        ConfigSource::Default => println!("# Built-in defaults"),
    }
    print!("{rendered}");
}
