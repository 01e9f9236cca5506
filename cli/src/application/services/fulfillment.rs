//! Fulfillment waiter.

use crate::application::ports::ProviderGateway;
use crate::domain::SpotRequestError;

/// Block until `request_id` is fulfilled.
///
/// There is no retry here: the gateway's own wait primitive owns polling,
/// and its failure is returned unchanged as [`SpotRequestError::Wait`].
///
/// # Errors
///
/// Returns [`SpotRequestError::Wait`] if the request fails, is cancelled, or
/// the wait itself errors.
pub async fn wait_for_fulfillment(
    gateway: &dyn ProviderGateway,
    request_id: &str,
) -> Result<(), SpotRequestError> {
    tracing::info!(request_id, "waiting for spot instance request to be fulfilled");

    if let Err(e) = gateway.wait_until_fulfilled(request_id).await {
        tracing::warn!(request_id, error = %e, "spot instance request was not fulfilled");
        return Err(SpotRequestError::Wait(e));
    }

    tracing::info!(request_id, "spot instance request fulfilled");
    Ok(())
}
