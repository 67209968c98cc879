//! Typed REST client for the Fusion control plane
//!
//! Every mutating endpoint returns an [`Operation`] handle; callers poll it
//! to completion via [`crate::operations::wait_operation_succeeded`].

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use thiserror::Error;

use fusion_core::{
    HostAccessPolicy, ListResponse, Operation, PlacementGroup, Snapshot, Tenant, TenantSpace,
    Volume, VolumePatch,
};

use crate::config::FusionConfig;

/// API base path prepended to every resource path
const API_BASE: &str = "/api/1.1";

/// Fusion API client errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid API host: {0}")]
    InvalidUrl(String),

    #[error("Client configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Fusion API returned error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Response parsing failed: {0}")]
    Parse(String),
}

/// Trait for Fusion control plane communication
///
/// One method per REST operation used by the teardown flow. Implemented by
/// [`HttpFusionClient`] for production and by mock clients in tests.
#[async_trait]
pub trait FusionApi: Send + Sync {
    async fn list_tenants(&self) -> Result<Vec<Tenant>, ApiError>;

    async fn list_tenant_spaces(&self, tenant: &str) -> Result<Vec<TenantSpace>, ApiError>;

    async fn delete_tenant_space(
        &self,
        tenant: &str,
        tenant_space: &str,
    ) -> Result<Operation, ApiError>;

    async fn list_volumes(&self, tenant: &str, tenant_space: &str)
        -> Result<Vec<Volume>, ApiError>;

    async fn update_volume(
        &self,
        tenant: &str,
        tenant_space: &str,
        volume: &str,
        patch: &VolumePatch,
    ) -> Result<Operation, ApiError>;

    async fn delete_volume(
        &self,
        tenant: &str,
        tenant_space: &str,
        volume: &str,
    ) -> Result<Operation, ApiError>;

    async fn list_snapshots(
        &self,
        tenant: &str,
        tenant_space: &str,
    ) -> Result<Vec<Snapshot>, ApiError>;

    async fn delete_snapshot(
        &self,
        tenant: &str,
        tenant_space: &str,
        snapshot: &str,
    ) -> Result<Operation, ApiError>;

    async fn list_placement_groups(
        &self,
        tenant: &str,
        tenant_space: &str,
    ) -> Result<Vec<PlacementGroup>, ApiError>;

    async fn delete_placement_group(
        &self,
        tenant: &str,
        tenant_space: &str,
        placement_group: &str,
    ) -> Result<Operation, ApiError>;

    async fn list_host_access_policies(&self) -> Result<Vec<HostAccessPolicy>, ApiError>;

    async fn delete_host_access_policy(&self, name: &str) -> Result<Operation, ApiError>;

    async fn get_operation(&self, id: &str) -> Result<Operation, ApiError>;
}

/// HTTP implementation of [`FusionApi`] backed by reqwest
pub struct HttpFusionClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl HttpFusionClient {
    /// Create a new client from configuration
    pub fn new(config: &FusionConfig) -> Result<Self, ApiError> {
        let access_token = config.require_access_token()?.to_string();

        let base_url = config.api_host.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::InvalidUrl(config.api_host.clone()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            access_token,
        })
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_BASE, path)
    }

    /// Extract the platform error message from a non-2xx response body
    fn extract_error_message(body: &str) -> String {
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .and_then(|m| m.as_str())
                    .map(|m| m.to_string())
            })
            .unwrap_or_else(|| {
                if body.is_empty() {
                    "Unknown error".to_string()
                } else {
                    body.to_string()
                }
            })
    }

    /// Make an authenticated API request
    async fn api_request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = self.build_url(path);
        log::debug!("Calling Fusion API: {} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .header("Content-Type", "application/json");

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: Self::extract_error_message(&text),
            });
        }

        log::debug!(
            "Fusion API response: status={}, body_size={}",
            status,
            text.len()
        );

        serde_json::from_str(&text).map_err(|e| ApiError::Parse(format!("JSON parse error: {}", e)))
    }

    async fn list<T>(&self, path: &str) -> Result<Vec<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let response: ListResponse<T> = self.api_request(Method::GET, path, None::<&()>).await?;
        Ok(response.items)
    }
}

fn tenant_space_path(tenant: &str, tenant_space: &str) -> String {
    format!(
        "/tenants/{}/tenant-spaces/{}",
        urlencoding::encode(tenant),
        urlencoding::encode(tenant_space)
    )
}

#[async_trait]
impl FusionApi for HttpFusionClient {
    async fn list_tenants(&self) -> Result<Vec<Tenant>, ApiError> {
        self.list("/tenants").await
    }

    async fn list_tenant_spaces(&self, tenant: &str) -> Result<Vec<TenantSpace>, ApiError> {
        self.list(&format!(
            "/tenants/{}/tenant-spaces",
            urlencoding::encode(tenant)
        ))
        .await
    }

    async fn delete_tenant_space(
        &self,
        tenant: &str,
        tenant_space: &str,
    ) -> Result<Operation, ApiError> {
        self.api_request(
            Method::DELETE,
            &tenant_space_path(tenant, tenant_space),
            None::<&()>,
        )
        .await
    }

    async fn list_volumes(
        &self,
        tenant: &str,
        tenant_space: &str,
    ) -> Result<Vec<Volume>, ApiError> {
        self.list(&format!(
            "{}/volumes",
            tenant_space_path(tenant, tenant_space)
        ))
        .await
    }

    async fn update_volume(
        &self,
        tenant: &str,
        tenant_space: &str,
        volume: &str,
        patch: &VolumePatch,
    ) -> Result<Operation, ApiError> {
        self.api_request(
            Method::PATCH,
            &format!(
                "{}/volumes/{}",
                tenant_space_path(tenant, tenant_space),
                urlencoding::encode(volume)
            ),
            Some(patch),
        )
        .await
    }

    async fn delete_volume(
        &self,
        tenant: &str,
        tenant_space: &str,
        volume: &str,
    ) -> Result<Operation, ApiError> {
        self.api_request(
            Method::DELETE,
            &format!(
                "{}/volumes/{}",
                tenant_space_path(tenant, tenant_space),
                urlencoding::encode(volume)
            ),
            None::<&()>,
        )
        .await
    }

    async fn list_snapshots(
        &self,
        tenant: &str,
        tenant_space: &str,
    ) -> Result<Vec<Snapshot>, ApiError> {
        self.list(&format!(
            "{}/snapshots",
            tenant_space_path(tenant, tenant_space)
        ))
        .await
    }

    async fn delete_snapshot(
        &self,
        tenant: &str,
        tenant_space: &str,
        snapshot: &str,
    ) -> Result<Operation, ApiError> {
        self.api_request(
            Method::DELETE,
            &format!(
                "{}/snapshots/{}",
                tenant_space_path(tenant, tenant_space),
                urlencoding::encode(snapshot)
            ),
            None::<&()>,
        )
        .await
    }

    async fn list_placement_groups(
        &self,
        tenant: &str,
        tenant_space: &str,
    ) -> Result<Vec<PlacementGroup>, ApiError> {
        self.list(&format!(
            "{}/placement-groups",
            tenant_space_path(tenant, tenant_space)
        ))
        .await
    }

    async fn delete_placement_group(
        &self,
        tenant: &str,
        tenant_space: &str,
        placement_group: &str,
    ) -> Result<Operation, ApiError> {
        self.api_request(
            Method::DELETE,
            &format!(
                "{}/placement-groups/{}",
                tenant_space_path(tenant, tenant_space),
                urlencoding::encode(placement_group)
            ),
            None::<&()>,
        )
        .await
    }

    async fn list_host_access_policies(&self) -> Result<Vec<HostAccessPolicy>, ApiError> {
        self.list("/host-access-policies").await
    }

    async fn delete_host_access_policy(&self, name: &str) -> Result<Operation, ApiError> {
        self.api_request(
            Method::DELETE,
            &format!("/host-access-policies/{}", urlencoding::encode(name)),
            None::<&()>,
        )
        .await
    }

    async fn get_operation(&self, id: &str) -> Result<Operation, ApiError> {
        self.api_request(
            Method::GET,
            &format!("/operations/{}", urlencoding::encode(id)),
            None::<&()>,
        )
        .await
    }
}
