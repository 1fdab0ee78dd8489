//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (TOML/YAML/JSON)
//! - Environment variables (API keys, `.env`)

use crate::error::{Error, Result};
use recast_core::credentials::env_var_name;
use recast_core::http::Url;
use recast_core::{HttpClientConfig, KeyStore, Provider, TimeoutConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Preset used when none is given and none is selected in the store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_preset: Option<String>,

    /// Provider configurations, keyed by provider name
    pub providers: BTreeMap<String, ProviderConfig>,

    /// HTTP settings
    pub http: HttpConfig,

    /// Path settings
    pub paths: PathConfig,
}

/// Provider-specific configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API key for this provider; the environment variable wins when both are set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// HTTP configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

/// Path configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// JSON file holding saved presets and the selection
    pub presets_file: PathBuf,
}

impl Default for HttpConfig {
    fn default() -> Self {
        let timeout = TimeoutConfig::default();
        Self {
            timeout_secs: timeout.request_timeout.as_secs(),
            connect_timeout_secs: timeout.connect_timeout.as_secs(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            presets_file: data_dir.join("recast").join("presets.json"),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config = match extension(path) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            _ => toml::from_str(&content)?,
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "Loaded configuration");
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to load config");
                    }
                }
            }
        }

        // Return default config if no config file found
        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        let config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::load()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Per-user configuration file
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("recast").join("config.toml"))
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            // Current directory
            PathBuf::from(".recast.toml"),
            PathBuf::from("recast.toml"),
            PathBuf::from(".recast.yaml"),
            PathBuf::from(".recast.json"),
        ];

        // User config directory
        if let Some(config_dir) = dirs::config_dir() {
            let recast_dir = config_dir.join("recast");
            paths.push(recast_dir.join("config.toml"));
            paths.push(recast_dir.join("config.yaml"));
            paths.push(recast_dir.join("config.json"));
        }

        paths
    }

    /// Check provider names, base URLs and timeouts
    pub fn validate(&self) -> Result<()> {
        for (name, provider) in &self.providers {
            name.parse::<Provider>()
                .map_err(|_| Error::config(format!("Unknown provider section: {}", name)))?;

            if let Some(base_url) = &provider.base_url {
                Url::parse(base_url).map_err(|e| {
                    Error::config(format!("Invalid base_url for {}: {}", name, e))
                })?;
            }
        }

        self.timeout_config().validate().map_err(Error::config)?;
        Ok(())
    }

    /// Get provider configuration
    pub fn get_provider(&self, provider: Provider) -> Option<&ProviderConfig> {
        self.providers.get(provider.as_str())
    }

    /// Credentials from the config file, overridden by the environment
    pub fn key_store(&self) -> KeyStore {
        let mut store = KeyStore::new();
        for provider in Provider::ALL {
            if let Some(key) = self.get_provider(provider).and_then(|p| p.api_key.as_deref()) {
                store.insert(provider, key);
            }
        }
        store.merge(KeyStore::from_env());
        store
    }

    /// Timeouts as configured
    pub fn timeout_config(&self) -> TimeoutConfig {
        TimeoutConfig::new(
            Duration::from_secs(self.http.connect_timeout_secs),
            Duration::from_secs(self.http.timeout_secs),
        )
    }

    /// HTTP client settings with any base URL overrides applied
    pub fn http_client_config(&self) -> Result<HttpClientConfig> {
        let mut config = HttpClientConfig::default().with_timeout(self.timeout_config());

        for provider in Provider::ALL {
            if let Some(base_url) = self.get_provider(provider).and_then(|p| p.base_url.as_deref()) {
                let url = Url::parse(base_url)
                    .map_err(|e| Error::config(format!("Invalid base_url for {}: {}", provider, e)))?;
                config = config.with_base_url(provider, url);
            }
        }

        Ok(config)
    }

    /// Commented default configuration written by `config init`
    pub fn default_toml() -> String {
        let defaults = Self::default();
        let mut content = String::from("# Recast configuration\n\n");
        content.push_str("# Preset used when none is given and none is selected\n");
        content.push_str("# default_preset = \"summary\"\n\n");
        content.push_str("[http]\n");
        content.push_str(&format!("timeout_secs = {}\n", defaults.http.timeout_secs));
        content.push_str(&format!(
            "connect_timeout_secs = {}\n\n",
            defaults.http.connect_timeout_secs
        ));
        content.push_str("[paths]\n");
        content.push_str(&format!(
            "presets_file = {:?}\n\n",
            defaults.paths.presets_file.display().to_string()
        ));
        content.push_str("# API keys may also come from the environment:\n");
        for provider in Provider::ALL {
            content.push_str(&format!("#   {}\n", env_var_name(provider)));
        }
        content.push('\n');
        for provider in Provider::ALL {
            content.push_str(&format!("# [providers.{}]\n", provider));
            content.push_str("# api_key = \"...\"\n");
            content.push_str("# base_url = \"...\"\n\n");
        }
        content
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = match extension(path) {
            Some("yaml") | Some("yml") => serde_yaml::to_string(self)?,
            Some("json") => serde_json::to_string_pretty(self)?,
            _ => toml::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e)))?,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|s| s.to_str())
}
