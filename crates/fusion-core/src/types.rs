//! Resource models for the Fusion REST API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope returned by all list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Top-level organizational resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub name: String,
    pub display_name: Option<String>,
}

/// Sub-scope within a tenant holding volumes, snapshots and placement groups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantSpace {
    pub name: String,
    pub display_name: Option<String>,
}

/// Block storage volume
///
/// Volumes follow a two-step deletion lifecycle: a volume must be destroyed
/// (soft-deleted) before it can be eradicated, and host access policies must
/// be detached before the destroy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volume {
    pub name: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub destroyed: bool,
    /// Names of host access policies currently attached to the volume
    #[serde(default)]
    pub host_access_policies: Vec<String>,
}

/// Partial update for a volume
///
/// Only fields set to `Some` are sent. Detaching all host access policies is
/// expressed by patching the attribute to the empty string.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VolumePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_access_policies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destroyed: Option<bool>,
}

impl VolumePatch {
    /// Patch that detaches every host access policy from the volume
    pub fn detach_all_host_access_policies() -> Self {
        Self {
            host_access_policies: Some(String::new()),
            destroyed: None,
        }
    }

    /// Patch that marks the volume as destroyed (soft-deleted)
    pub fn destroy() -> Self {
        Self {
            host_access_policies: None,
            destroyed: Some(true),
        }
    }
}

/// Point-in-time snapshot of volumes in a tenant space
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub name: String,
    pub display_name: Option<String>,
}

/// Placement group controlling volume co-location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementGroup {
    pub name: String,
    pub display_name: Option<String>,
}

/// Global access-control object attachable to volumes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostAccessPolicy {
    pub name: String,
    pub display_name: Option<String>,
}

/// Terminal and in-flight states of an asynchronous operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationStatus {
    Pending,
    Running,
    Aborting,
    Succeeded,
    Failed,
    /// Forward compatibility with states added by newer API versions
    #[serde(other)]
    Unknown,
}

impl OperationStatus {
    /// Whether the operation has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, OperationStatus::Succeeded | OperationStatus::Failed)
    }
}

/// Error detail carried by a failed operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationFailure {
    pub message: String,
}

/// Asynchronous task returned by every mutating call
///
/// Mutating endpoints return immediately with an operation handle; callers
/// poll `GET /operations/{id}` until the operation reaches a terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    pub id: String,
    pub status: OperationStatus,
    pub request_type: Option<String>,
    pub error: Option<OperationFailure>,
    /// Server hint for the next poll delay, in milliseconds
    pub retry_in: Option<u64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Operation {
    /// Construct an operation handle in the given state
    ///
    /// Convenience used by tests and mock clients.
    pub fn with_status(id: &str, status: OperationStatus) -> Self {
        Self {
            id: id.to_string(),
            status,
            request_type: None,
            error: None,
            retry_in: None,
            created_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_patch_skips_unset_fields() {
        let patch = VolumePatch::destroy();
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "destroyed": true }));

        let patch = VolumePatch::detach_all_host_access_policies();
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "host_access_policies": "" }));
    }

    #[test]
    fn test_volume_defaults() {
        let volume: Volume = serde_json::from_str(r#"{ "name": "vol-1" }"#).unwrap();
        assert_eq!(volume.name, "vol-1");
        assert!(!volume.destroyed);
        assert!(volume.host_access_policies.is_empty());
    }

    #[test]
    fn test_operation_status_parsing() {
        let op: Operation = serde_json::from_str(
            r#"{ "id": "op-1", "status": "Succeeded", "request_type": "DeleteVolume" }"#,
        )
        .unwrap();
        assert_eq!(op.status, OperationStatus::Succeeded);
        assert!(op.status.is_terminal());

        let op: Operation =
            serde_json::from_str(r#"{ "id": "op-2", "status": "Compacting" }"#).unwrap();
        assert_eq!(op.status, OperationStatus::Unknown);
        assert!(!op.status.is_terminal());
    }

    #[test]
    fn test_failed_operation_carries_message() {
        let op: Operation = serde_json::from_str(
            r#"{ "id": "op-3", "status": "Failed", "error": { "message": "volume busy" } }"#,
        )
        .unwrap();
        assert!(op.status.is_terminal());
        assert_eq!(op.error.unwrap().message, "volume busy");
    }

    #[test]
    fn test_list_response_defaults_to_empty() {
        let list: ListResponse<Tenant> = serde_json::from_str("{}").unwrap();
        assert!(list.items.is_empty());
    }
}
