//! Sequence configuration.
//!
//! Supports TOML config files, environment variable overrides, and defaults.

use crate::error::SeqError;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Tuning knobs for an [`ObservableSequence`](crate::sequence::ObservableSequence).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Elements to reserve room for at construction (default: 0)
    pub initial_capacity: usize,
    /// Whether `clear` keeps the allocated buffer (default: false)
    pub keep_capacity_on_clear: bool,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            keep_capacity_on_clear: false,
        }
    }
}

impl SequenceConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SeqError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| SeqError::ConfigError(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string. Missing keys take their defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, SeqError> {
        toml::from_str(toml_str).map_err(|e| SeqError::ConfigError(format!("Invalid TOML: {}", e)))
    }

    /// Saves the configuration to a TOML file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SeqError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| SeqError::ConfigError(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path.as_ref(), toml)
            .map_err(|e| SeqError::ConfigError(format!("Failed to write config file: {}", e)))?;
        Ok(())
    }

    /// Applies environment variable overrides.
    /// Environment variables are prefixed with `OBSEQ_`.
    /// Example: `OBSEQ_INITIAL_CAPACITY=256` overrides `initial_capacity`.
    pub fn apply_env_overrides(&mut self) -> Result<(), SeqError> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), SeqError> {
        if let Some(val) = lookup("OBSEQ_INITIAL_CAPACITY") {
            self.initial_capacity = val.parse().map_err(|_| {
                SeqError::ConfigError(format!("Invalid initial_capacity: {}", val))
            })?;
        }
        if let Some(val) = lookup("OBSEQ_KEEP_CAPACITY_ON_CLEAR") {
            self.keep_capacity_on_clear = val.parse().map_err(|_| {
                SeqError::ConfigError(format!("Invalid keep_capacity_on_clear: {}", val))
            })?;
        }
        Ok(())
    }
}
