//!
//! This module defines the formatter configuration, its defaults, and how it is loaded.
//! Values are resolved with the precedence CLI flag → environment → config file → default.

use crate::document::ReplaceStrategy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the project configuration file
pub const CONFIG_FILE: &str = ".bazelfmt.toml";

/// Environment variable that overrides the configured formatter
pub const FORMATTER_ENV: &str = "BAZELFMT_FORMATTER";

/// Formatter used when nothing else is configured, resolved through `PATH`
pub const DEFAULT_FORMATTER: &str = "buildifier";

/// Default timeout per formatter invocation, in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Configuration for one formatter invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FormatterConfig {
    /// Executable name or path (default: "buildifier")
    #[serde(default = "default_formatter")]
    pub formatter: String,

    /// Extra arguments passed before any file-type argument
    #[serde(default)]
    pub args: Vec<String>,

    /// Timeout in milliseconds; 0 waits for the formatter indefinitely
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// How formatted output is written back into the document
    #[serde(default)]
    pub replace_strategy: ReplaceStrategy,

    /// Append `--type=<kind>` when the Bazel file kind is known
    #[serde(default = "default_true")]
    pub pass_file_type: bool,
}

fn default_formatter() -> String {
    DEFAULT_FORMATTER.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_true() -> bool {
    true
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            formatter: default_formatter(),
            args: Vec::new(),
            timeout: default_timeout(),
            replace_strategy: ReplaceStrategy::default(),
            pass_file_type: true,
        }
    }
}

impl FormatterConfig {
    /// Config for a specific formatter command with everything else at defaults.
    pub fn with_formatter(formatter: impl Into<String>) -> Self {
        Self {
            formatter: formatter.into(),
            ..Self::default()
        }
    }

    /// Parse a config from TOML text. `path` is only used in error messages.
    pub fn from_toml_str(content: &str, path: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let path_str = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            source: e,
            path: path_str.clone(),
        })?;
        let config = Self::from_toml_str(&content, &path_str)?;
        config.validate(&path_str)?;
        log::info!("Loaded bazelfmt config from: {path_str}");
        Ok(config)
    }

    fn validate(&self, path: &str) -> Result<(), ConfigError> {
        if self.formatter.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                path: path.to_string(),
                key: "formatter".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Render the config as TOML, as shown by `bazelfmt config`.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }
}

/// Where the effective config came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Default,
    File(PathBuf),
}

/// A loaded config together with its origin.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: FormatterConfig,
    pub source: ConfigSource,
}

/// Command-line values that take precedence over everything else.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub formatter: Option<String>,
    pub timeout: Option<u64>,
}

/// Load the effective configuration.
///
/// - `config_path`: explicit file (`--config`); discovery is skipped
/// - `no_config`: ignore config files entirely (`--no-config`)
/// - `start_dir`: directory where upward discovery begins
pub fn load_config(
    config_path: Option<&Path>,
    no_config: bool,
    start_dir: &Path,
    overrides: &ConfigOverrides,
) -> Result<LoadedConfig, ConfigError> {
    let mut loaded = if no_config {
        LoadedConfig {
            config: FormatterConfig::default(),
            source: ConfigSource::Default,
        }
    } else if let Some(path) = config_path {
        LoadedConfig {
            config: FormatterConfig::load_from_file(path)?,
            source: ConfigSource::File(path.to_path_buf()),
        }
    } else if let Some(found) = discover_config_file(start_dir) {
        LoadedConfig {
            config: FormatterConfig::load_from_file(&found)?,
            source: ConfigSource::File(found),
        }
    } else {
        log::debug!("No {CONFIG_FILE} found from {}, using defaults", start_dir.display());
        LoadedConfig {
            config: FormatterConfig::default(),
            source: ConfigSource::Default,
        }
    };

    apply_env_and_overrides(&mut loaded.config, std::env::var(FORMATTER_ENV).ok(), overrides);
    Ok(loaded)
}

fn apply_env_and_overrides(config: &mut FormatterConfig, env_formatter: Option<String>, overrides: &ConfigOverrides) {
    if let Some(formatter) = env_formatter.filter(|f| !f.trim().is_empty()) {
        log::debug!("Formatter overridden by {FORMATTER_ENV}: {formatter}");
        config.formatter = formatter;
    }
    if let Some(formatter) = &overrides.formatter {
        config.formatter = formatter.clone();
    }
    if let Some(timeout) = overrides.timeout {
        config.timeout = timeout;
    }
}

/// Walk upward from `start_dir` looking for [`CONFIG_FILE`].
///
/// The search stops after the first directory that contains `.git`, so a config in a
/// parent of the repository never leaks into it.
pub fn discover_config_file(start_dir: &Path) -> Option<PathBuf> {
    let start = start_dir.canonicalize().unwrap_or_else(|_| start_dir.to_path_buf());
    for dir in start.ancestors() {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            log::debug!("Found config file: {}", candidate.display());
            return Some(candidate);
        }
        if dir.join(".git").exists() {
            log::debug!("Reached repository root at {}", dir.display());
            break;
        }
    }
    None
}

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file at {path}: {source}")]
    IoError { source: io::Error, path: String },

    /// Failed to parse the configuration content
    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: String, message: String },

    /// A key parsed but holds an unusable value
    #[error("Invalid value for '{key}' in {path}: {message}")]
    InvalidValue { path: String, key: String, message: String },

    #[error("Failed to serialize config: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = FormatterConfig::default();
        assert_eq!(config.formatter, "buildifier");
        assert!(config.args.is_empty());
        assert_eq!(config.timeout, 30_000);
        assert_eq!(config.replace_strategy, ReplaceStrategy::Minimal);
        assert!(config.pass_file_type);
    }

    #[test]
    fn test_deserialize_config() {
        let toml = r#"
formatter = "/opt/bin/buildifier"
args = ["--lint=fix", "--warnings=all"]
timeout = 5000
replace-strategy = "whole"
pass-file-type = false
"#;
        let config = FormatterConfig::from_toml_str(toml, "test").expect("Failed to parse TOML");
        assert_eq!(config.formatter, "/opt/bin/buildifier");
        assert_eq!(config.args, vec!["--lint=fix", "--warnings=all"]);
        assert_eq!(config.timeout, 5000);
        assert_eq!(config.replace_strategy, ReplaceStrategy::Whole);
        assert!(!config.pass_file_type);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = FormatterConfig::from_toml_str("timeout = 0\n", "test").unwrap();
        assert_eq!(config.formatter, "buildifier");
        assert_eq!(config.timeout, 0);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = FormatterConfig::from_toml_str("formater = \"x\"\n", "cfg.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("cfg.toml"));
    }

    #[test]
    fn test_empty_formatter_rejected() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&path, "formatter = \"  \"\n").unwrap();
        let err = FormatterConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "formatter"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = tempdir().unwrap();
        let err = FormatterConfig::load_from_file(&temp_dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
    }

    #[test]
    fn test_discovery_walks_upward() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE), "formatter = \"cat\"\n").unwrap();
        let nested = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let found = discover_config_file(&nested).expect("config should be found");
        assert!(found.ends_with(CONFIG_FILE));
    }

    #[test]
    fn test_discovery_stops_at_git_root() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE), "formatter = \"cat\"\n").unwrap();
        let repo = temp_dir.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();

        assert_eq!(discover_config_file(&repo), None);
    }

    #[test]
    fn test_overrides_precedence() {
        let mut config = FormatterConfig::default();
        apply_env_and_overrides(&mut config, Some("env-fmt".to_string()), &ConfigOverrides::default());
        assert_eq!(config.formatter, "env-fmt");

        let overrides = ConfigOverrides {
            formatter: Some("cli-fmt".to_string()),
            timeout: Some(10),
        };
        apply_env_and_overrides(&mut config, Some("env-fmt".to_string()), &overrides);
        assert_eq!(config.formatter, "cli-fmt");
        assert_eq!(config.timeout, 10);
    }

    #[test]
    fn test_blank_env_formatter_ignored() {
        let mut config = FormatterConfig::default();
        apply_env_and_overrides(&mut config, Some(String::new()), &ConfigOverrides::default());
        assert_eq!(config.formatter, "buildifier");
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = FormatterConfig {
            args: vec!["--mode=fix".to_string()],
            ..FormatterConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("formatter = \"buildifier\""));
        assert!(text.contains("replace-strategy = \"minimal\""));
        assert_eq!(FormatterConfig::from_toml_str(&text, "rt").unwrap(), config);
    }
}
