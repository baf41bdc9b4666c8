use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::store::StorePaths;
use crate::tui::theme::ThemeConfig;

#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    /// Directory holding `tasks.json`, `history.json` and the log file.
    /// Default: ~/.todo
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// Whether to write a log file at all. Default: true
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum level written (`error`, `warn`, `info`, `debug`, `trace`). Default: "info"
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            enabled: true,
            level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Resolve the data directory: explicit override, then config, then ~/.todo.
    pub fn data_dir(&self, override_dir: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = override_dir {
            return Ok(dir.to_path_buf());
        }
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => base_dir(),
        }
    }

    pub fn store_paths(&self, override_dir: Option<&Path>) -> Result<StorePaths> {
        Ok(StorePaths::in_dir(&self.data_dir(override_dir)?))
    }

    pub fn log_path(&self, override_dir: Option<&Path>) -> Result<PathBuf> {
        Ok(self.data_dir(override_dir)?.join("todo.log"))
    }
}

/// Returns the base todo directory: ~/.todo/
pub fn base_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    Ok(home.join(".todo"))
}

/// Returns the path to the config file: ~/.todo/config.toml
pub fn config_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("config.toml"))
}

/// Ensure the data directory exists
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))
}

/// Load config from ~/.todo/config.toml (or return defaults if it doesn't exist)
pub fn load() -> Result<Config> {
    load_from(&config_path()?)
}

pub fn load_from(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    } else {
        Ok(Config::default())
    }
}
