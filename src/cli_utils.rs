//! Helpers shared by the command handlers.

use bazelfmt_lib::config::{self, ConfigOverrides, LoadedConfig};
use bazelfmt_lib::exit_codes::exit;
use colored::*;
use std::path::{Path, PathBuf};

/// Load the effective configuration, exiting with a tool error if it cannot be read.
pub fn load_config_with_cli_error_handling(
    config_path: Option<&str>,
    no_config: bool,
    overrides: &ConfigOverrides,
) -> LoadedConfig {
    let start_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    match config::load_config(config_path.map(Path::new), no_config, &start_dir, overrides) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{}: {}", "Config error".red().bold(), e);
            exit::tool_error();
        }
    }
}
