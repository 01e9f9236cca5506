//! Tag propagator: group tags onto a resolved instance, audit tag onto the
//! request.
//!
//! Spot requests issued directly by the controller bypass the provider's
//! launch-time group tag inheritance, so the group's tags are applied here
//! explicitly once the instance exists.

use fleetspot_common::FleetGroup;

use crate::application::ports::ProviderGateway;
use crate::application::services::request_tag::tag_request;
use crate::domain::{LAUNCHED_FOR_GROUP_TAG, SpotRequestError, instance_tags};

/// Apply `group`'s tags to `instance_id` in one call, then record
/// [`LAUNCHED_FOR_GROUP_TAG`] on `request_id`.
///
/// Returns the number of tags applied to the instance. A group with no tags
/// skips the instance call but still records the audit tag.
///
/// # Errors
///
/// Returns [`SpotRequestError::Tag`] with the provider error unchanged if
/// either create-tags call fails. The instance call is atomic, so there is
/// no partial result to report.
pub async fn propagate_group_tags(
    gateway: &dyn ProviderGateway,
    request_id: &str,
    instance_id: &str,
    group: &FleetGroup,
) -> Result<usize, SpotRequestError> {
    let tags = instance_tags(&group.tags);

    if tags.is_empty() {
        tracing::debug!(instance_id, group = %group.name, "fleet group has no tags to propagate");
    } else {
        tracing::info!(instance_id, count = tags.len(), "tagging new spot instance");
        gateway
            .create_tags(instance_id, &tags)
            .await
            .map_err(|e| {
                tracing::warn!(instance_id, error = %e, "failed to tag spot instance");
                SpotRequestError::Tag(e)
            })?;
    }

    tag_request(gateway, request_id, LAUNCHED_FOR_GROUP_TAG, &group.name).await?;
    Ok(tags.len())
}
