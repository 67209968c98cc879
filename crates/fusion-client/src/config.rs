//! Client configuration
//!
//! Loads the API endpoint and credentials from defaults, well-known
//! configuration files and `FUSION_*` environment variables.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Missing required setting: {0}")]
    Missing(&'static str),
}

/// Cadence and deadline for operation polling
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    /// Delay between successive operation polls, in milliseconds
    pub interval_ms: u64,
    /// Overall deadline for a single operation to complete, in seconds
    pub timeout_secs: u64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            timeout_secs: 900,
        }
    }
}

impl PollSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Connection settings for the Fusion control plane
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Base URL of the API endpoint, without the `/api/<version>` suffix
    pub api_host: String,

    /// Bearer token used for every request
    pub access_token: Option<String>,

    /// HTTP request timeout, in seconds
    pub timeout_secs: u64,

    /// Operation polling settings
    pub poll: PollSettings,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            api_host: "https://localhost:8080".to_string(),
            access_token: None,
            timeout_secs: 30,
            poll: PollSettings::default(),
        }
    }
}

impl FusionConfig {
    /// Load configuration from a file, with environment overrides applied
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(config::Environment::with_prefix("FUSION"))
            .build()?;

        let config: FusionConfig = settings.try_deserialize()?;
        Ok(config)
    }

    /// Load configuration with defaults and environment overrides
    ///
    /// Scans well-known file locations; the first one that loads wins.
    pub fn load_with_defaults() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let config_paths = vec!["/etc/fusion/fusion.toml", "./fusion.toml"];

        for path in config_paths {
            if Path::new(path).exists() {
                match Self::load_from_file(path) {
                    Ok(loaded_config) => {
                        config = loaded_config;
                        break;
                    }
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", path, e);
                    }
                }
            }
        }

        // Apply environment overrides
        if let Ok(api_host) = std::env::var("FUSION_API_HOST") {
            config.api_host = api_host;
        }

        if let Ok(token) = std::env::var("FUSION_ACCESS_TOKEN") {
            config.access_token = Some(token);
        }

        Ok(config)
    }

    /// Access token, or an error pointing at the missing setting
    pub fn require_access_token(&self) -> Result<&str, ConfigError> {
        self.access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::Missing("access_token (FUSION_ACCESS_TOKEN)"))
    }
}
