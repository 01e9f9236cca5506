//! Request resolver: fulfilled spot request → bound, describable instance.

use crate::application::ports::ProviderGateway;
use crate::domain::{OrphanReason, SpotRequestError};

/// Result of resolving a fulfilled request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The request is bound to an instance the provider can describe.
    Resolved { instance_id: String },
    /// Nothing to tag. Not an error: usually an eventual-consistency gap.
    Orphaned(OrphanReason),
}

/// Find the instance bound to `request_id` and confirm it is describable.
///
/// Issues exactly one describe-requests call and, when the first record
/// names an instance, exactly one describe-instances call. Empty results
/// are reported as [`Resolution::Orphaned`].
///
/// # Errors
///
/// Returns [`SpotRequestError::Resolve`] if either describe call fails.
pub async fn resolve_instance(
    gateway: &dyn ProviderGateway,
    request_id: &str,
) -> Result<Resolution, SpotRequestError> {
    let records = gateway
        .describe_spot_requests(request_id)
        .await
        .map_err(|e| {
            tracing::warn!(request_id, error = %e, "failed to describe spot instance request");
            SpotRequestError::Resolve(e)
        })?;

    let Some(record) = records.first() else {
        return Ok(orphaned(request_id, OrphanReason::RequestNotVisible));
    };

    let provider_state = record.state.as_deref().unwrap_or("unknown");
    let Some(instance_id) = record
        .instance_id
        .as_deref()
        .filter(|id| !id.is_empty())
    else {
        tracing::debug!(request_id, provider_state, "spot instance request has no instance id");
        return Ok(orphaned(request_id, OrphanReason::NoInstanceBound));
    };

    tracing::info!(request_id, instance_id, provider_state, "found new spot instance");

    let reservations = gateway.describe_instances(instance_id).await.map_err(|e| {
        tracing::warn!(request_id, instance_id, error = %e, "failed to describe spot instance");
        SpotRequestError::Resolve(e)
    })?;

    let Some(reservation) = reservations.first() else {
        return Ok(orphaned(request_id, OrphanReason::InstanceNotVisible));
    };
    tracing::debug!(
        request_id,
        instance_id,
        reservation_id = reservation.reservation_id.as_deref().unwrap_or("unknown"),
        instances = ?reservation.instance_ids,
        "spot instance is visible"
    );

    Ok(Resolution::Resolved {
        instance_id: instance_id.to_owned(),
    })
}

fn orphaned(request_id: &str, reason: OrphanReason) -> Resolution {
    tracing::warn!(request_id, %reason, "nothing to tag for spot instance request");
    Resolution::Orphaned(reason)
}
