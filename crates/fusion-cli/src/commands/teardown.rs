//! Teardown command

use anyhow::{Context, Result};
use std::path::Path;

use fusion_client::{FusionConfig, HttpFusionClient};
use fusion_teardown::teardown_workloads;

/// Teardown command implementation
pub struct TeardownCommand;

impl TeardownCommand {
    /// Create new teardown command
    pub fn new() -> Self {
        Self
    }

    /// Execute the teardown against the configured endpoint
    pub async fn execute(&self, config_path: Option<&Path>) -> Result<()> {
        let config = match config_path {
            Some(path) => FusionConfig::load_from_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            None => {
                FusionConfig::load_with_defaults().context("Failed to load configuration")?
            }
        };

        log::info!("Using API endpoint {}", config.api_host);

        let client =
            HttpFusionClient::new(&config).context("Failed to create Fusion API client")?;

        teardown_workloads(&client, &config.poll)
            .await
            .context("Teardown failed")?;

        Ok(())
    }
}

impl Default for TeardownCommand {
    fn default() -> Self {
        Self::new()
    }
}
