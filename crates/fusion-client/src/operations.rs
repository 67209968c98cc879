//! Asynchronous operation polling
//!
//! Mutating Fusion endpoints return an operation handle immediately; the
//! caller blocks on [`wait_operation_succeeded`] until the operation reaches
//! a terminal state.

use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

use fusion_core::OperationStatus;

use crate::client::{ApiError, FusionApi};
use crate::config::PollSettings;

/// Operation polling errors
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("Operation {id} failed: {message}")]
    Failed { id: String, message: String },

    #[error("Timed out waiting for operation {id}")]
    Timeout { id: String },

    #[error("API error while polling operation: {0}")]
    Api(#[from] ApiError),
}

/// Block until the operation reaches a terminal state
///
/// Returns `Ok(())` on success and an error if the operation fails, the
/// deadline passes, or a poll request itself fails. The server's `retry_in`
/// hint is honored when present, capped at the configured interval.
pub async fn wait_operation_succeeded(
    op_id: &str,
    client: &dyn FusionApi,
    poll: &PollSettings,
) -> Result<(), OperationError> {
    let deadline = Instant::now() + poll.timeout();

    loop {
        let op = client.get_operation(op_id).await?;

        match op.status {
            OperationStatus::Succeeded => {
                log::debug!("Operation {} succeeded", op.id);
                return Ok(());
            }
            OperationStatus::Failed => {
                let message = op
                    .error
                    .map(|e| e.message)
                    .unwrap_or_else(|| "Unknown failure".to_string());
                return Err(OperationError::Failed { id: op.id, message });
            }
            status => {
                log::debug!("Operation {} still {:?}", op.id, status);
            }
        }

        if Instant::now() >= deadline {
            return Err(OperationError::Timeout {
                id: op_id.to_string(),
            });
        }

        let delay = op
            .retry_in
            .map(Duration::from_millis)
            .unwrap_or_else(|| poll.interval())
            .min(poll.interval());
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fusion_core::{
        HostAccessPolicy, Operation, OperationFailure, PlacementGroup, Snapshot, Tenant,
        TenantSpace, Volume, VolumePatch,
    };
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Mock client serving a scripted sequence of operation states
    struct StatusSequenceClient {
        statuses: Mutex<VecDeque<Operation>>,
    }

    impl StatusSequenceClient {
        fn new(statuses: Vec<Operation>) -> Self {
            Self {
                statuses: Mutex::new(statuses.into()),
            }
        }
    }

    #[async_trait]
    impl FusionApi for StatusSequenceClient {
        async fn list_tenants(&self) -> Result<Vec<Tenant>, ApiError> {
            unreachable!("not used by the poller")
        }

        async fn list_tenant_spaces(&self, _: &str) -> Result<Vec<TenantSpace>, ApiError> {
            unreachable!("not used by the poller")
        }

        async fn delete_tenant_space(&self, _: &str, _: &str) -> Result<Operation, ApiError> {
            unreachable!("not used by the poller")
        }

        async fn list_volumes(&self, _: &str, _: &str) -> Result<Vec<Volume>, ApiError> {
            unreachable!("not used by the poller")
        }

        async fn update_volume(
            &self,
            _: &str,
            _: &str,
            _: &str,
            _: &VolumePatch,
        ) -> Result<Operation, ApiError> {
            unreachable!("not used by the poller")
        }

        async fn delete_volume(&self, _: &str, _: &str, _: &str) -> Result<Operation, ApiError> {
            unreachable!("not used by the poller")
        }

        async fn list_snapshots(&self, _: &str, _: &str) -> Result<Vec<Snapshot>, ApiError> {
            unreachable!("not used by the poller")
        }

        async fn delete_snapshot(&self, _: &str, _: &str, _: &str) -> Result<Operation, ApiError> {
            unreachable!("not used by the poller")
        }

        async fn list_placement_groups(
            &self,
            _: &str,
            _: &str,
        ) -> Result<Vec<PlacementGroup>, ApiError> {
            unreachable!("not used by the poller")
        }

        async fn delete_placement_group(
            &self,
            _: &str,
            _: &str,
            _: &str,
        ) -> Result<Operation, ApiError> {
            unreachable!("not used by the poller")
        }

        async fn list_host_access_policies(&self) -> Result<Vec<HostAccessPolicy>, ApiError> {
            unreachable!("not used by the poller")
        }

        async fn delete_host_access_policy(&self, _: &str) -> Result<Operation, ApiError> {
            unreachable!("not used by the poller")
        }

        async fn get_operation(&self, id: &str) -> Result<Operation, ApiError> {
            let mut statuses = self.statuses.lock().unwrap();
            match statuses.pop_front() {
                Some(op) => Ok(op),
                None => Ok(Operation::with_status(id, OperationStatus::Pending)),
            }
        }
    }

    fn fast_poll() -> PollSettings {
        PollSettings {
            interval_ms: 1,
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_pending_then_succeeded() {
        let client = StatusSequenceClient::new(vec![
            Operation::with_status("op-1", OperationStatus::Pending),
            Operation::with_status("op-1", OperationStatus::Running),
            Operation::with_status("op-1", OperationStatus::Succeeded),
        ]);

        let result = wait_operation_succeeded("op-1", &client, &fast_poll()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_failed_operation() {
        let mut failed = Operation::with_status("op-2", OperationStatus::Failed);
        failed.error = Some(OperationFailure {
            message: "volume busy".to_string(),
        });
        let client = StatusSequenceClient::new(vec![failed]);

        let result = wait_operation_succeeded("op-2", &client, &fast_poll()).await;
        match result {
            Err(OperationError::Failed { id, message }) => {
                assert_eq!(id, "op-2");
                assert_eq!(message, "volume busy");
            }
            other => panic!("Expected failed operation, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_failed_operation_without_detail() {
        let client = StatusSequenceClient::new(vec![Operation::with_status(
            "op-3",
            OperationStatus::Failed,
        )]);

        let result = wait_operation_succeeded("op-3", &client, &fast_poll()).await;
        match result {
            Err(OperationError::Failed { message, .. }) => {
                assert_eq!(message, "Unknown failure");
            }
            other => panic!("Expected failed operation, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_poll_deadline() {
        // Never reaches a terminal state; deadline of zero trips immediately
        let client = StatusSequenceClient::new(vec![]);
        let poll = PollSettings {
            interval_ms: 1,
            timeout_secs: 0,
        };

        let result = wait_operation_succeeded("op-4", &client, &poll).await;
        assert!(matches!(result, Err(OperationError::Timeout { id }) if id == "op-4"));
    }

    #[tokio::test]
    async fn test_poll_error_propagates() {
        struct BrokenClient;

        #[async_trait]
        impl FusionApi for BrokenClient {
            async fn list_tenants(&self) -> Result<Vec<Tenant>, ApiError> {
                unreachable!()
            }
            async fn list_tenant_spaces(&self, _: &str) -> Result<Vec<TenantSpace>, ApiError> {
                unreachable!()
            }
            async fn delete_tenant_space(&self, _: &str, _: &str) -> Result<Operation, ApiError> {
                unreachable!()
            }
            async fn list_volumes(&self, _: &str, _: &str) -> Result<Vec<Volume>, ApiError> {
                unreachable!()
            }
            async fn update_volume(
                &self,
                _: &str,
                _: &str,
                _: &str,
                _: &VolumePatch,
            ) -> Result<Operation, ApiError> {
                unreachable!()
            }
            async fn delete_volume(
                &self,
                _: &str,
                _: &str,
                _: &str,
            ) -> Result<Operation, ApiError> {
                unreachable!()
            }
            async fn list_snapshots(&self, _: &str, _: &str) -> Result<Vec<Snapshot>, ApiError> {
                unreachable!()
            }
            async fn delete_snapshot(
                &self,
                _: &str,
                _: &str,
                _: &str,
            ) -> Result<Operation, ApiError> {
                unreachable!()
            }
            async fn list_placement_groups(
                &self,
                _: &str,
                _: &str,
            ) -> Result<Vec<PlacementGroup>, ApiError> {
                unreachable!()
            }
            async fn delete_placement_group(
                &self,
                _: &str,
                _: &str,
                _: &str,
            ) -> Result<Operation, ApiError> {
                unreachable!()
            }
            async fn list_host_access_policies(&self) -> Result<Vec<HostAccessPolicy>, ApiError> {
                unreachable!()
            }
            async fn delete_host_access_policy(&self, _: &str) -> Result<Operation, ApiError> {
                unreachable!()
            }
            async fn get_operation(&self, _: &str) -> Result<Operation, ApiError> {
                Err(ApiError::Api {
                    status: 503,
                    message: "service unavailable".to_string(),
                })
            }
        }

        let result = wait_operation_succeeded("op-5", &BrokenClient, &fast_poll()).await;
        assert!(matches!(result, Err(OperationError::Api(_))));
    }
}
