//! Configuration file handling for frota-cli

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the CLI tool
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Default server URL (versioned API base)
    pub server: Option<String>,
    /// Default output format
    pub output: Option<String>,
    /// Disable colored output
    pub no_color: Option<bool>,
    /// Service-account username
    pub username: Option<String>,
    /// Service-account password
    pub password: Option<String>,
    /// Chat endpoint for AI reports
    pub chat_url: Option<String>,
    /// API key for the chat endpoint
    pub chat_api_key: Option<String>,
}

impl Config {
    /// Load configuration from the default config file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path).with_context(|| {
                format!("Failed to read config file: {}", config_path.display())
            })?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("frota-cli");

        Ok(config_dir.join("config.toml"))
    }

    /// Merge CLI arguments over config file values.
    ///
    /// `server` stays `None` when neither side set it, so environment
    /// defaults further down the stack still apply.
    pub fn merge_with_args(&self, server: Option<&str>, no_color: bool) -> MergedConfig {
        MergedConfig {
            server: server.map(String::from).or_else(|| self.server.clone()),
            no_color: no_color || self.no_color.unwrap_or(false),
            username: self.username.clone(),
            password: self.password.clone(),
            chat_url: self.chat_url.clone(),
            chat_api_key: self.chat_api_key.clone(),
        }
    }
}

/// Fully resolved configuration after merging CLI args
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub server: Option<String>,
    pub no_color: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub chat_url: Option<String>,
    pub chat_api_key: Option<String>,
}
