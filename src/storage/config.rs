//! Configuration handling for task-cli
//!
//! The only setting is where the task file lives. It is resolved from, in
//! order: the `--file` flag or `TASKCLI_FILE`, the `task_file` key in
//! `~/.config/task-cli/config.toml`, and finally the built-in default.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Task file used when nothing else is configured, relative to the working directory
pub const DEFAULT_TASK_FILE: &str = "src/main/resources/TaskList.json";

/// Environment variable that overrides the task file
pub const TASK_FILE_ENV: &str = "TASKCLI_FILE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Task file to use instead of the default
    pub task_file: Option<PathBuf>,
}

/// Resolved configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub global: GlobalConfig,
    /// Where the global config was read from, if it existed
    pub source: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from the default location
    pub fn load() -> Result<Self> {
        match Self::global_config_path() {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads configuration from a specific file; a missing file means defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read global config: {}", path.display()))?;

        let global: GlobalConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse global config: {}", path.display()))?;

        Ok(Self {
            global,
            source: Some(path.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "task-cli", "task-cli").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Picks the task file: explicit override, then config, then default
    pub fn task_file(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.global.task_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TASK_FILE))
    }
}
