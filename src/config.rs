//! Configuration for `Pathwise`
//!
//! Settings live in a TOML file under the platform config directory. The
//! compiled-in defaults fill any field the user file leaves empty, and CLI
//! flags override both for a single run without touching the file.
//!
//! Values may reference `$PATHWISE`, which expands to the config directory.

use crate::logger;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Default configuration for the current build profile
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the config directory in path values
const DIR_VARIABLE: &str = "$PATHWISE";

/// Errors from reading, editing or writing the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The key is not a known setting
    #[error("Unknown config key: '{0}'")]
    UnknownKey(String),

    /// The value cannot be used for the key
    #[error("Invalid value for '{key}': '{value}'")]
    InvalidValue {
        /// Setting name
        key: String,
        /// Rejected value
        value: String,
    },

    /// The config file could not be read, written or removed
    #[error("config file error: {0}")]
    Io(#[from] std::io::Error),

    /// The config could not be serialized
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path; empty logs to the terminal
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Paths configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Snapshot file read when no `--snapshot` flag is given
    #[serde(default)]
    pub snapshot_file: String,
    /// Directory for report output files
    #[serde(default)]
    pub reports_dir: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override snapshot file
    pub snapshot_file: Option<String>,
    /// Override reports output directory
    pub reports_dir: Option<String>,
}

/// Fill `target` from `default` when `target` is empty. Returns `true` if filled.
fn fill_if_empty(target: &mut String, default: &str) -> bool {
    if target.is_empty() && !default.is_empty() {
        default.clone_into(target);
        return true;
    }
    false
}

impl Config {
    /// Keys accepted by [`get`](Self::get), [`set`](Self::set) and [`unset`](Self::unset)
    pub const KEYS: [&'static str; 5] = ["level", "file", "verbose", "snapshot_file", "reports_dir"];

    /// Get the `$PATHWISE` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/pathwise`
    /// - macOS: `~/Library/Application Support/pathwise`
    /// - Windows: `%APPDATA%\pathwise`
    #[must_use]
    pub fn get_pathwise_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pathwise")
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds.
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_pathwise_dir().join(CONFIG_FILE_NAME)
    }

    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_pathwise_dir();
            value.replace(DIR_VARIABLE, &dir.to_string_lossy())
        } else {
            value.to_string()
        }
    }

    /// Parse config from a TOML string, expanding `$PATHWISE` in path values
    ///
    /// Missing fields take their serde defaults (empty strings, `false`).
    ///
    /// # Errors
    /// Returns an error if the TOML cannot be parsed or doesn't match the schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.snapshot_file = Self::expand_variables(&config.paths.snapshot_file);
        config.paths.reports_dir = Self::expand_variables(&config.paths.reports_dir);

        Ok(config)
    }

    /// Load the compiled-in defaults for this build profile
    ///
    /// # Panics
    /// Panics if the embedded default configuration is not valid TOML. The
    /// defaults are compiled into the binary and covered by tests.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Fill empty fields from `defaults`
    ///
    /// Booleans are left alone since `false` is a real setting.
    /// Returns `true` if any field changed.
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let filled = [
            fill_if_empty(&mut self.logging.level, &defaults.logging.level),
            fill_if_empty(&mut self.logging.file, &defaults.logging.file),
            fill_if_empty(&mut self.paths.snapshot_file, &defaults.paths.snapshot_file),
            fill_if_empty(&mut self.paths.reports_dir, &defaults.paths.reports_dir),
        ];
        filled.contains(&true)
    }

    /// Apply CLI-provided overrides for this run only
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }
        if let Some(snapshot_file) = &overrides.snapshot_file {
            self.paths.snapshot_file.clone_from(snapshot_file);
        }
        if let Some(reports_dir) = &overrides.reports_dir {
            self.paths.reports_dir.clone_from(reports_dir);
        }
    }

    /// Load configuration from file, or create it from defaults on first run
    ///
    /// Missing fields are merged from defaults and written back so upgrades
    /// pick up new settings. Falls back to defaults if the file is unreadable.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if !config_file.exists() {
            let _ = defaults.save();
            return defaults;
        }

        let Ok(content) = fs::read_to_string(&config_file) else {
            return defaults;
        };
        match Self::from_toml(&content) {
            Ok(mut config) => {
                if config.merge_defaults(&defaults) {
                    let _ = config.save();
                }
                config
            }
            Err(e) => {
                crate::warn!(
                    "Ignoring unreadable config {}: {e}",
                    config_file.display()
                );
                defaults
            }
        }
    }

    /// Save configuration to the user config file
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&config_file, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Keys are listed in [`KEYS`](Self::KEYS); `-` and `_` are interchangeable.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "snapshot_file" | "snapshot-file" => Some(self.paths.snapshot_file.clone()),
            "reports_dir" | "reports-dir" => Some(self.paths.reports_dir.clone()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Call [`save`](Self::save) to persist the change.
    ///
    /// # Errors
    /// Returns an error for an unknown key, an unknown log level or a
    /// non-boolean `verbose` value
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "level" => {
                if logger::parse_level(value).is_none() {
                    return Err(invalid());
                }
                self.logging.level = value.to_string();
            }
            "file" => self.logging.file = value.to_string(),
            "verbose" => self.logging.verbose = value.parse().map_err(|_| invalid())?,
            "snapshot_file" | "snapshot-file" => self.paths.snapshot_file = value.to_string(),
            "reports_dir" | "reports-dir" => self.paths.reports_dir = value.to_string(),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Reset one value to its default
    ///
    /// # Errors
    /// Returns an error if the key is not recognized
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), ConfigError> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "snapshot_file" | "snapshot-file" => self
                .paths
                .snapshot_file
                .clone_from(&defaults.paths.snapshot_file),
            "reports_dir" | "reports-dir" => self
                .paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Delete the config file so the next [`load`](Self::load) recreates it
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed
    pub fn reset() -> Result<(), ConfigError> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  snapshot_file = \"{}\"", self.paths.snapshot_file)?;
        writeln!(f, "  reports_dir = \"{}\"", self.paths.reports_dir)?;

        Ok(())
    }
}
