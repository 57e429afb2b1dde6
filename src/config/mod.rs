//! Configuration module for oems-rs
//!
//! Settings are read from a TOML file. Every field has a default, so an
//! empty or partial file is valid.
//!
//! # Lookup Order
//!
//! 1. An explicit `--config <path>` argument
//! 2. `oems.toml` in the working directory
//! 3. `oems.toml` in the platform config directory:
//!    - **Linux**: `~/.config/oems-rs/`
//!    - **macOS**: `~/Library/Application Support/oems-rs/`
//!    - **Windows**: `%APPDATA%\oems-rs\`
//! 4. Built-in defaults
//!
//! # Example
//!
//! ```toml
//! workers = 19
//!
//! [input]
//! path = "numbers"
//! format = "bytes"
//!
//! [output]
//! format = "json"
//!
//! [logging]
//! level = "debug"
//! file = "oems.log"
//! ```

use crate::error::{OemsError, Result};
use crate::input::InputFormat;
use crate::network::NETWORK_NODES;
use crate::output::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for config directories
pub const APP_ID: &str = "oems-rs";

/// Config filename
pub const CONFIG_FILE: &str = "oems.toml";

/// Input file read when none is configured
pub const DEFAULT_INPUT_PATH: &str = "numbers";

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Get the platform config directory for this application
pub fn app_config_dir() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID))
}

/// Config file candidates, most specific first
pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(dir) = app_config_dir() {
        paths.push(dir.join(CONFIG_FILE));
    }
    paths
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Number of node workers to launch; must match the network size
    pub workers: usize,

    pub input: InputConfig,

    pub output: OutputConfig,

    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workers: NETWORK_NODES,
            input: InputConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Where the raw values come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub path: PathBuf,
    pub format: InputFormat,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_INPUT_PATH),
            format: InputFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Log filter and optional log file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,

    /// Also write logs to this file
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

impl AppConfig {
    /// Load a config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            OemsError::Configuration(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        toml::from_str(&content).map_err(|e| {
            OemsError::Configuration(format!("Failed to parse config file {:?}: {}", path, e))
        })
    }

    /// Load a config file, returning defaults if any error occurs
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Load the first config file found in [`config_search_paths`].
    ///
    /// A file that exists but does not parse is an error, not a fallback.
    pub fn discover() -> Result<(Self, Option<PathBuf>)> {
        for path in config_search_paths() {
            if path.is_file() {
                return Ok((Self::load(&path)?, Some(path)));
            }
        }
        Ok((Self::default(), None))
    }

    /// Save config to disk as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    OemsError::Configuration(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| OemsError::Serialization(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            OemsError::Configuration(format!("Failed to write config file {:?}: {}", path, e))
        })
    }

    /// Set the input path
    pub fn with_input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input.path = path.into();
        self
    }
}
