//! Single-tag applier for the spot request resource itself.

use fleetspot_common::Tag;

use crate::application::context::RequestContext;
use crate::application::ports::ProviderGateway;
use crate::domain::{SpotInstanceRequest, SpotRequestError};

/// Set one `key = value` tag on `request_id`.
///
/// One create-tags call. The provider overwrites an existing key, so
/// repeating the call is idempotent.
///
/// # Errors
///
/// Returns [`SpotRequestError::Tag`] carrying the provider error unchanged.
pub async fn tag_request(
    gateway: &dyn ProviderGateway,
    request_id: &str,
    key: &str,
    value: &str,
) -> Result<(), SpotRequestError> {
    let tag = Tag::new(key, value);
    gateway
        .create_tags(request_id, std::slice::from_ref(&tag))
        .await
        .map_err(|e| {
            tracing::warn!(request_id, key, error = %e, "failed to tag spot instance request");
            SpotRequestError::Tag(e)
        })?;

    tracing::debug!(request_id, key, value, "tagged spot instance request");
    Ok(())
}

/// Tag `request` with `key`, valued with the name of the group it was
/// launched for.
///
/// # Errors
///
/// Returns [`SpotRequestError::Tag`] carrying the provider error unchanged.
pub async fn tag(
    ctx: &RequestContext,
    request: &SpotInstanceRequest,
    key: &str,
) -> Result<(), SpotRequestError> {
    tag_request(ctx.gateway(), request.id(), key, request.group()).await
}
