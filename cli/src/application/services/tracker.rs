//! Spot request tracker: waiter → resolver → propagator, one task per
//! request.

use std::collections::HashMap;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::Instrument;

use crate::application::context::RequestContext;
use crate::application::services::fulfillment::wait_for_fulfillment;
use crate::application::services::resolver::{Resolution, resolve_instance};
use crate::application::services::tag_propagation::propagate_group_tags;
use crate::domain::{OrphanReason, RequestState, SpotInstanceRequest, SpotRequestError};

/// How a successfully processed request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FulfillmentOutcome {
    /// The instance carries the group's tags.
    Tagged {
        instance_id: String,
        tags_applied: usize,
    },
    /// Fulfilled, but nothing could be resolved to tag.
    Orphaned(OrphanReason),
}

/// Final state of one tracked request.
#[derive(Debug)]
pub struct TrackReport {
    pub request: SpotInstanceRequest,
    pub result: Result<FulfillmentOutcome, SpotRequestError>,
}

impl TrackReport {
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.result.is_err()
    }
}

/// Wait for `request` to be fulfilled, resolve its instance, and tag it.
///
/// Each stage short-circuits on failure and `request` is left `failed`.
/// An unresolvable instance leaves it `orphaned` and is returned as
/// `Ok(FulfillmentOutcome::Orphaned)`.
///
/// # Errors
///
/// Returns [`SpotRequestError::AlreadyProcessed`] without touching the
/// gateway if `request` is not `pending`, otherwise the error of the first
/// failing stage.
pub async fn wait_for_and_tag_instance(
    ctx: &RequestContext,
    request: &mut SpotInstanceRequest,
) -> Result<FulfillmentOutcome, SpotRequestError> {
    if request.state() != RequestState::Pending {
        return Err(SpotRequestError::AlreadyProcessed {
            request_id: request.id().to_owned(),
            state: request.state(),
        });
    }

    let gateway = ctx.gateway();

    if let Err(e) = wait_for_fulfillment(gateway, request.id()).await {
        request.fail();
        return Err(e);
    }
    request.transition(RequestState::Fulfilled)?;

    let instance_id = match resolve_instance(gateway, request.id()).await {
        Ok(Resolution::Resolved { instance_id }) => instance_id,
        Ok(Resolution::Orphaned(reason)) => {
            request.transition(RequestState::Orphaned)?;
            return Ok(FulfillmentOutcome::Orphaned(reason));
        }
        Err(e) => {
            request.fail();
            return Err(e);
        }
    };
    request.bind_instance(instance_id.clone())?;

    match propagate_group_tags(gateway, request.id(), &instance_id, ctx.group()).await {
        Ok(tags_applied) => {
            request.transition(RequestState::Tagged)?;
            tracing::info!(instance_id = %instance_id, tags_applied, "spot instance tagged");
            Ok(FulfillmentOutcome::Tagged {
                instance_id,
                tags_applied,
            })
        }
        Err(e) => {
            request.fail();
            Err(e)
        }
    }
}

/// Track every request concurrently, one task each.
///
/// Returns one report per request, sorted by request id. A task that panics
/// or is cancelled is reported as [`SpotRequestError::TaskAborted`].
pub async fn track_all(
    ctx: &RequestContext,
    requests: Vec<SpotInstanceRequest>,
) -> Vec<TrackReport> {
    track_all_until(ctx, requests, None).await
}

/// Like [`track_all`], but gives up on unfinished requests once `deadline`
/// has passed.
///
/// Requests that finished in time keep their reports. The rest are aborted
/// and reported as [`SpotRequestError::TaskAborted`] with reason
/// `"deadline exceeded"`.
pub async fn track_all_until(
    ctx: &RequestContext,
    requests: Vec<SpotInstanceRequest>,
    deadline: Option<Duration>,
) -> Vec<TrackReport> {
    let expires_at = deadline.map(|d| Instant::now() + d);
    let mut expired = false;
    let mut tasks = JoinSet::new();
    let mut in_flight = HashMap::with_capacity(requests.len());

    for mut request in requests {
        let task_ctx = ctx.clone();
        let span = tracing::info_span!(
            "spot_request",
            request_id = %request.id(),
            group = %ctx.group().name,
            region = %ctx.region(),
        );
        let snapshot = request.clone();
        let handle = tasks.spawn(
            async move {
                let result = wait_for_and_tag_instance(&task_ctx, &mut request).await;
                TrackReport { request, result }
            }
            .instrument(span),
        );
        in_flight.insert(handle.id(), snapshot);
    }

    let mut reports = Vec::with_capacity(in_flight.len());
    loop {
        let next = match expires_at {
            Some(at) if !expired => tokio::select! {
                joined = tasks.join_next_with_id() => Some(joined),
                () = tokio::time::sleep_until(at) => None,
            },
            _ => Some(tasks.join_next_with_id().await),
        };
        let Some(next) = next else {
            tracing::warn!(unfinished = tasks.len(), "deadline passed, aborting spot request tracking");
            expired = true;
            tasks.abort_all();
            continue;
        };
        let Some(joined) = next else {
            break;
        };

        match joined {
            Ok((id, report)) => {
                in_flight.remove(&id);
                reports.push(report);
            }
            Err(e) => {
                let Some(mut request) = in_flight.remove(&e.id()) else {
                    continue;
                };
                let reason = if e.is_panic() {
                    "task panicked"
                } else if expired {
                    "deadline exceeded"
                } else {
                    "task cancelled"
                };
                tracing::error!(request_id = %request.id(), reason, "spot request tracking aborted");
                request.fail();
                reports.push(TrackReport {
                    result: Err(SpotRequestError::TaskAborted {
                        request_id: request.id().to_owned(),
                        reason: reason.to_owned(),
                    }),
                    request,
                });
            }
        }
    }

    reports.sort_by(|a, b| a.request.id().cmp(b.request.id()));
    reports
}
