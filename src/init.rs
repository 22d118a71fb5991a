//!
//! This module provides initialization utilities for bazelfmt, such as creating the default configuration file.

use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Error type for initialization operations
#[derive(Error, Debug)]
pub enum InitError {
    #[error("Failed to access file {path}: {source}")]
    IoError { source: io::Error, path: String },
}

/// Contents written by `bazelfmt init`. Every value is the built-in default.
pub const DEFAULT_CONFIG: &str = r#"# bazelfmt configuration file

# Formatter executable, looked up in PATH unless it is a path.
# BAZELFMT_FORMATTER and --formatter take precedence over this value.
formatter = "buildifier"

# Extra arguments for every invocation, e.g. ["--lint=fix", "--warnings=all"]
args = []

# Milliseconds to wait for the formatter before giving up (0 = wait forever)
timeout = 30000

# How formatted output is written back: "minimal" rewrites only the changed span,
# "whole" replaces the buffer and keeps the cursor at its old offset
replace-strategy = "minimal"

# Pass --type=build|bzl|workspace|module|default based on the file name
pass-file-type = true
"#;

/// Create a default configuration file at the specified path.
///
/// Returns `true` if the file was created, or `false` if it already exists.
///
/// # Errors
///
/// Returns an error if the file cannot be created due to permissions or other I/O errors.
pub fn create_default_config(path: &Path) -> Result<bool, InitError> {
    if path.exists() {
        return Ok(false);
    }

    fs::write(path, DEFAULT_CONFIG).map_err(|source| InitError::IoError {
        source,
        path: path.display().to_string(),
    })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormatterConfig;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_matches_builtin_defaults() {
        let parsed = FormatterConfig::from_toml_str(DEFAULT_CONFIG, "default").unwrap();
        assert_eq!(parsed, FormatterConfig::default());
    }

    #[test]
    fn test_create_does_not_overwrite() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join(".bazelfmt.toml");

        assert!(create_default_config(&path).unwrap());
        fs::write(&path, "formatter = \"mine\"\n").unwrap();
        assert!(!create_default_config(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "formatter = \"mine\"\n");
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("missing").join(".bazelfmt.toml");
        assert!(matches!(create_default_config(&path), Err(InitError::IoError { .. })));
    }
}
