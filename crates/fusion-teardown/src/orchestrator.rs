//! Teardown orchestration
//!
//! Traverses the resource hierarchy top-down (tenants, tenant spaces) and
//! deletes bottom-up: per tenant space the volumes (detach, destroy,
//! eradicate), then snapshots, then placement groups, then the tenant space
//! itself. Host access policies are global and deleted in a final pass, after
//! every volume referencing them is gone. Strictly sequential; the first
//! failing call aborts the whole run.

use thiserror::Error;

use fusion_client::{wait_operation_succeeded, ApiError, FusionApi, OperationError, PollSettings};
use fusion_core::VolumePatch;

/// Teardown errors, tagged with the failing call site
#[derive(Debug, Error)]
pub enum TeardownError {
    #[error("API request failed in {call}: {source}")]
    Api {
        call: &'static str,
        #[source]
        source: ApiError,
    },

    #[error(transparent)]
    Operation(#[from] OperationError),
}

fn api_call(call: &'static str) -> impl FnOnce(ApiError) -> TeardownError {
    move |source| TeardownError::Api { call, source }
}

/// Delete all workloads reachable through the client, in dependency order
///
/// Any resources already deleted before a failure stay deleted; re-running
/// the teardown picks up whatever the list calls still return.
pub async fn teardown_workloads(
    client: &dyn FusionApi,
    poll: &PollSettings,
) -> Result<(), TeardownError> {
    println!("Tearing down workloads");

    let tenants = client
        .list_tenants()
        .await
        .map_err(api_call("TenantsApi->list_tenants"))?;
    log::debug!("Found {} tenants", tenants.len());

    for tenant in &tenants {
        let tenant_spaces = client
            .list_tenant_spaces(&tenant.name)
            .await
            .map_err(api_call("TenantSpacesApi->list_tenant_spaces"))?;

        for tenant_space in &tenant_spaces {
            let volumes = client
                .list_volumes(&tenant.name, &tenant_space.name)
                .await
                .map_err(api_call("VolumesApi->list_volumes"))?;

            for volume in &volumes {
                println!(
                    "Detaching host access policies from volume {} in tenant space {} in tenant {}",
                    volume.name, tenant_space.name, tenant.name
                );
                let op = client
                    .update_volume(
                        &tenant.name,
                        &tenant_space.name,
                        &volume.name,
                        &VolumePatch::detach_all_host_access_policies(),
                    )
                    .await
                    .map_err(api_call("VolumesApi->update_volume"))?;
                wait_operation_succeeded(&op.id, client, poll).await?;

                // The platform enforces two-step volume deletion: a volume
                // must be destroyed before it can be eradicated.
                println!(
                    "Destroying volume {} in tenant space {} in tenant {}",
                    volume.name, tenant_space.name, tenant.name
                );
                let op = client
                    .update_volume(
                        &tenant.name,
                        &tenant_space.name,
                        &volume.name,
                        &VolumePatch::destroy(),
                    )
                    .await
                    .map_err(api_call("VolumesApi->update_volume"))?;
                wait_operation_succeeded(&op.id, client, poll).await?;

                println!(
                    "Eradicating volume {} in tenant space {} in tenant {}",
                    volume.name, tenant_space.name, tenant.name
                );
                let op = client
                    .delete_volume(&tenant.name, &tenant_space.name, &volume.name)
                    .await
                    .map_err(api_call("VolumesApi->delete_volume"))?;
                wait_operation_succeeded(&op.id, client, poll).await?;
            }

            let snapshots = client
                .list_snapshots(&tenant.name, &tenant_space.name)
                .await
                .map_err(api_call("SnapshotsApi->list_snapshots"))?;

            for snapshot in &snapshots {
                println!(
                    "Deleting snapshot {} in tenant space {} in tenant {}",
                    snapshot.name, tenant_space.name, tenant.name
                );
                let op = client
                    .delete_snapshot(&tenant.name, &tenant_space.name, &snapshot.name)
                    .await
                    .map_err(api_call("SnapshotsApi->delete_snapshot"))?;
                wait_operation_succeeded(&op.id, client, poll).await?;
            }

            let placement_groups = client
                .list_placement_groups(&tenant.name, &tenant_space.name)
                .await
                .map_err(api_call("PlacementGroupsApi->list_placement_groups"))?;

            for placement_group in &placement_groups {
                println!(
                    "Deleting placement group {} in tenant space {} in tenant {}",
                    placement_group.name, tenant_space.name, tenant.name
                );
                let op = client
                    .delete_placement_group(&tenant.name, &tenant_space.name, &placement_group.name)
                    .await
                    .map_err(api_call("PlacementGroupsApi->delete_placement_group"))?;
                wait_operation_succeeded(&op.id, client, poll).await?;
            }

            println!(
                "Deleting tenant space {} in tenant {}",
                tenant_space.name, tenant.name
            );
            let op = client
                .delete_tenant_space(&tenant.name, &tenant_space.name)
                .await
                .map_err(api_call("TenantSpacesApi->delete_tenant_space"))?;
            wait_operation_succeeded(&op.id, client, poll).await?;
        }
    }

    // Host access policies are global; only deletable once no volume
    // references them, so this pass runs after all tenant spaces are gone.
    let policies = client
        .list_host_access_policies()
        .await
        .map_err(api_call("HostAccessPoliciesApi->list_host_access_policies"))?;

    for policy in &policies {
        println!("Deleting host access policy {}", policy.name);
        let op = client
            .delete_host_access_policy(&policy.name)
            .await
            .map_err(api_call("HostAccessPoliciesApi->delete_host_access_policy"))?;
        wait_operation_succeeded(&op.id, client, poll).await?;
    }

    println!("Done tearing down workloads!");
    Ok(())
}
