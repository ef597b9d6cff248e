//! Configuration management

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub appearance: AppearanceConfig,
    pub messages: MessagesConfig,
}

/// Connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the signup service
    pub base_url: String,

    /// Override for the token file location
    pub token_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            token_path: None,
        }
    }
}

/// Appearance settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Show activity descriptions in the roster
    pub show_descriptions: bool,

    /// Show the schedule line in the roster
    pub show_schedule: bool,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            show_descriptions: true,
            show_schedule: true,
        }
    }
}

/// Feedback message settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagesConfig {
    /// Seconds before a feedback message is dismissed
    pub dismiss_seconds: u64,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self { dismiss_seconds: 5 }
    }
}

impl Config {
    /// Load config from the default path, or return defaults if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rollcall")
            .join("config.toml")
    }

    /// Token file location: the explicit override or the platform data dir
    pub fn token_path(&self) -> PathBuf {
        self.server.token_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("rollcall")
                .join("token")
        })
    }

    /// How long a feedback message stays on screen
    pub fn dismiss_delay(&self) -> Duration {
        Duration::from_secs(self.messages.dismiss_seconds)
    }
}
