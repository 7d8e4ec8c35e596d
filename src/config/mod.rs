// ABOUTME: Configuration management for washbook
// Backend endpoint settings and the wizard flow preset, loaded from TOML
// files with path precedence and an environment override.

use crate::wizard::FlowChoice;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use url::Url;

/// Environment variable overriding the configured backend base URL
pub const BASE_URL_ENV: &str = "WASHBOOK_BASE_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend endpoint settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Wizard flow settings
    #[serde(default)]
    pub wizard: WizardConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL the customer endpoints hang off, trailing slash implied
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WizardConfig {
    /// Which flow preset the booking wizard runs
    #[serde(default)]
    pub flow: FlowChoice,
}

fn default_base_url() -> String {
    "http://localhost:8080/customer/".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            wizard: WizardConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from default locations, later files overriding
    /// earlier ones, then apply the environment override.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        for path in Self::config_paths().into_iter().rev() {
            if path.exists() {
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config from {}", path.display()))?;
                let file_config: AppConfig = toml::from_str(&content)
                    .with_context(|| format!("Failed to parse config from {}", path.display()))?;
                config.merge(file_config);
            }
        }

        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                config.api.base_url = base_url;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the user config directory
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::user_config_dir()?;
        fs::create_dir_all(&config_dir)?;

        let config_path = config_dir.join("config.toml");
        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;

        Ok(())
    }

    /// Merge another config into this one. Fields still at their default
    /// do not override values an earlier file already set.
    fn merge(&mut self, other: AppConfig) {
        if other.api.base_url != default_base_url() {
            self.api.base_url = other.api.base_url;
        }
        if other.api.timeout_secs != default_timeout_secs() {
            self.api.timeout_secs = other.api.timeout_secs;
        }
        if other.wizard.flow != FlowChoice::default() {
            self.wizard.flow = other.wizard.flow;
        }
    }

    /// Configuration file paths in order of precedence
    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        // 1. Local project config
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(".washbook").join("config.toml"));
        }

        // 2. User config (~/.washbook/config.toml)
        if let Ok(config_dir) = Self::user_config_dir() {
            paths.push(config_dir.join("config.toml"));
        }

        paths
    }

    fn user_config_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home_dir.join(".washbook"))
    }

    /// Reject configs whose base URL would fail every request anyway
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api.base_url)
            .with_context(|| format!("Invalid base URL in config: {}", self.api.base_url))?;
        Ok(())
    }
}
