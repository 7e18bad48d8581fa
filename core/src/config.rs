//! Configuration management.
//!
//! Stores configuration in JSON format at `~/.psview/config.json`. Every
//! field has a default, so a missing file or key is never an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::INTERPRETER;
use crate::error::{Error, Result};

/// Configuration data stored in JSON format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Name pattern used when none is given on the command line.
    #[serde(default = "default_pattern")]
    pub default_pattern: String,

    /// Maximum number of socket-table lookups running at once.
    #[serde(default = "default_lookup_concurrency")]
    pub lookup_concurrency: usize,

    /// Per-lookup timeout in milliseconds.
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
}

fn default_pattern() -> String {
    INTERPRETER.to_string()
}

fn default_lookup_concurrency() -> usize {
    8
}

fn default_lookup_timeout_ms() -> u64 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_pattern: default_pattern(),
            lookup_concurrency: default_lookup_concurrency(),
            lookup_timeout_ms: default_lookup_timeout_ms(),
        }
    }
}

impl Config {
    /// Lookup concurrency, never below one.
    pub fn concurrency(&self) -> usize {
        self.lookup_concurrency.max(1)
    }

    /// Per-lookup timeout.
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

/// Configuration store.
///
/// Handles reading and writing configuration to `~/.psview/config.json`.
pub struct ConfigStore {
    /// Path to the configuration file.
    config_path: PathBuf,
}

impl ConfigStore {
    /// Create a new config store with the default path.
    ///
    /// Default path: `~/.psview/config.json`
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

        Ok(Self {
            config_path: home.join(".psview").join("config.json"),
        })
    }

    /// Create a config store with a custom path (for testing).
    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Path of the configuration file.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Load configuration from disk.
    ///
    /// Returns default config if the file doesn't exist.
    pub async fn load(&self) -> Result<Config> {
        if !fs::try_exists(&self.config_path).await.unwrap_or(false) {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to disk, creating the directory if needed.
    pub async fn save(&self, config: &Config) -> Result<()> {
        if let Some(dir) = self.config_path.parent() {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(config)?;

        let mut file = fs::File::create(&self.config_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to create config file: {}", e)))?;
        file.write_all(content.as_bytes())
            .await
            .map_err(|e| Error::Config(format!("Failed to write config: {}", e)))?;
        file.flush().await?;

        Ok(())
    }
}
