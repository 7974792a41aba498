//! CLI configuration file.
//!
//! # Responsibility
//! - Load optional TOML settings for logging and display.
//! - Merge command-line overrides on top of file values.

use anyhow::{bail, Context, Result};
use pagetree_core::{default_log_level, UNTITLED_LABEL};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// Absolute directory for rolling log files. Logging is off when unset.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            dir: None,
        }
    }
}

fn default_level() -> String {
    default_log_level().to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_untitled_label")]
    pub untitled_label: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            untitled_label: default_untitled_label(),
        }
    }
}

fn default_untitled_label() -> String {
    UNTITLED_LABEL.to_string()
}

/// Reads `path` when given; otherwise returns defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.display.untitled_label.trim().is_empty() {
        bail!("display.untitled_label must not be blank");
    }
    if let Some(dir) = &config.logging.dir {
        if !dir.is_absolute() {
            bail!("logging.dir must be an absolute path, got {}", dir.display());
        }
    }
    Ok(config)
}

impl Config {
    /// Applies command-line overrides.
    pub fn with_overrides(mut self, level: Option<String>, dir: Option<PathBuf>) -> Self {
        if let Some(level) = level {
            self.logging.level = level;
        }
        if let Some(dir) = dir {
            self.logging.dir = Some(dir);
        }
        self
    }
}
