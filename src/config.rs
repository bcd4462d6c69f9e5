//! User configuration loaded from `config.toml`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::lifecycle::DEFAULT_RECORD_TYPE;

/// Upper bound on `recent_limit`.
pub const MAX_RECENT_LIMIT: usize = 50;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML or has the wrong shape.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The config parsed but a value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),

    /// The platform does not provide a config directory.
    #[error("could not determine XDG config directory")]
    NoConfigDir,
}

/// Settings for the intake form and its host.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct IntakeConfig {
    /// Number of rows requested from the recent list.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    /// Record type handed to the router on navigation.
    #[serde(default = "default_record_type")]
    pub record_type: String,
    /// Refresh the recent list after each successful create.
    #[serde(default = "default_true")]
    pub refresh_after_create: bool,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Overrides the data directory for the request store and log file.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_recent_limit() -> usize {
    5
}

fn default_record_type() -> String {
    DEFAULT_RECORD_TYPE.to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
            record_type: default_record_type(),
            refresh_after_create: true,
            log_filter: default_log_filter(),
            data_dir: None,
        }
    }
}

impl IntakeConfig {
    /// Loads `~/.config/intake/config.toml`, falling back to defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Self::load_or_default(config_dir.join("intake").join("config.toml"))
    }

    /// Loads the given file, or returns defaults if it does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match fs::read_to_string(path.as_ref()) {
            Ok(raw) => Self::from_toml_str(&raw),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_RECENT_LIMIT).contains(&self.recent_limit) {
            return Err(ConfigError::Invalid(format!(
                "recent_limit must be between 1 and {MAX_RECENT_LIMIT}, got {}",
                self.recent_limit
            )));
        }
        if self.record_type.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "record_type cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
