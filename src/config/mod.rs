//! Configuration for the compare sidebar

use crate::paths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors from reading or writing the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read
    #[error("Failed to read config from {}", path.display())]
    Read {
        /// Config file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
    /// The file is not valid config JSON
    #[error("Failed to parse config from {}", path.display())]
    Parse {
        /// Config file path
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },
    /// The file or its directory could not be written
    #[error("Failed to write config to {}", path.display())]
    Write {
        /// Config file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
    /// The config could not be turned into JSON
    #[error("Failed to serialize config")]
    Serialize(#[source] serde_json::Error),
}

/// Sidebar configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Quiet period after the last commit selection before changed files load
    #[serde(default = "default_load_changed_files_delay_ms")]
    pub load_changed_files_delay_ms: u64,

    /// Load the next history page once this few unseen rows remain
    #[serde(default = "default_close_to_bottom_threshold")]
    pub close_to_bottom_threshold: usize,

    /// How many recently checked out branches the picker offers
    #[serde(default = "default_recent_branches_limit")]
    pub recent_branches_limit: usize,

    /// How long the interactive view waits for a key before ticking
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

const fn default_load_changed_files_delay_ms() -> u64 {
    200
}

const fn default_close_to_bottom_threshold() -> usize {
    10
}

const fn default_recent_branches_limit() -> usize {
    5
}

const fn default_tick_rate_ms() -> u64 {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            load_changed_files_delay_ms: default_load_changed_files_delay_ms(),
            close_to_bottom_threshold: default_close_to_bottom_threshold(),
            recent_branches_limit: default_recent_branches_limit(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, falling back to
    /// defaults when no file exists
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Save configuration to a specific path, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        let contents = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(path, contents).map_err(write_error)?;
        Ok(())
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn default_path() -> PathBuf {
        paths::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("branch-compare")
            .join("config.json")
    }
}
