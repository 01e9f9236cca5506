//! Tests for concurrent tracking of many spot requests.

#![allow(clippy::expect_used)]

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fleetspot_cli::application::services::tracker::{
    FulfillmentOutcome, track_all, track_all_until,
};
use fleetspot_cli::application::{ProviderGateway, Reservation, SpotRequestRecord};
use fleetspot_cli::domain::{
    OrphanReason, ProviderError, RequestState, SpotInstanceRequest, SpotRequestError,
};
use fleetspot_common::Tag;
use tokio::sync::Barrier;

use crate::mocks::{RecordingGateway, StallingGateway, context, web_group};

fn pending(ids: &[&str]) -> Vec<SpotInstanceRequest> {
    ids.iter()
        .map(|id| SpotInstanceRequest::new(*id, "us-east-1", "web"))
        .collect()
}

#[tokio::test]
async fn reports_every_request_sorted_by_id() {
    let gateway = Arc::new(
        RecordingGateway::new()
            .fulfilled("sir-a", "i-a")
            .wait_fails("sir-b", "InsufficientInstanceCapacity")
            .bound_to_invisible("sir-c", "i-c"),
    );
    let ctx = context(gateway.clone(), web_group());

    let reports = track_all(&ctx, pending(&["sir-c", "sir-a", "sir-b"])).await;

    let ids: Vec<&str> = reports.iter().map(|r| r.request.id()).collect();
    assert_eq!(ids, vec!["sir-a", "sir-b", "sir-c"]);

    assert_eq!(reports[0].request.state(), RequestState::Tagged);
    assert!(matches!(
        reports[0].result,
        Ok(FulfillmentOutcome::Tagged { .. })
    ));

    assert_eq!(reports[1].request.state(), RequestState::Failed);
    let err = reports[1].result.as_ref().expect_err("wait failed");
    assert_eq!(err.to_string(), "InsufficientInstanceCapacity");

    assert_eq!(reports[2].request.state(), RequestState::Orphaned);
    assert_eq!(
        reports[2].result.as_ref().ok(),
        Some(&FulfillmentOutcome::Orphaned(OrphanReason::InstanceNotVisible))
    );
    assert!(!reports[2].is_failure());
}

#[tokio::test]
async fn empty_batch_issues_no_calls() {
    let gateway = Arc::new(RecordingGateway::new());
    let ctx = context(gateway.clone(), web_group());

    let reports = track_all(&ctx, Vec::new()).await;

    assert!(reports.is_empty());
    assert!(gateway.calls().is_empty());
}

// ── Concurrency ───────────────────────────────────────────────────────────────

/// Wait only completes once every request is waiting at the same time.
struct BarrierGateway {
    barrier: Barrier,
}

#[async_trait]
impl ProviderGateway for BarrierGateway {
    async fn wait_until_fulfilled(&self, _: &str) -> Result<(), ProviderError> {
        self.barrier.wait().await;
        Ok(())
    }

    async fn describe_spot_requests(&self, _: &str) -> Result<Vec<SpotRequestRecord>, ProviderError> {
        Ok(Vec::new())
    }

    async fn describe_instances(&self, _: &str) -> Result<Vec<Reservation>, ProviderError> {
        Ok(Vec::new())
    }

    async fn create_tags(&self, _: &str, _: &[Tag]) -> Result<(), ProviderError> {
        Ok(())
    }
}

#[tokio::test]
async fn one_blocking_wait_does_not_stall_the_others() {
    let gateway = Arc::new(BarrierGateway {
        barrier: Barrier::new(3),
    });
    let ctx = context(gateway, web_group());

    let reports = tokio::time::timeout(
        Duration::from_secs(5),
        track_all(&ctx, pending(&["sir-1", "sir-2", "sir-3"])),
    )
    .await
    .expect("waits must run concurrently");

    assert_eq!(reports.len(), 3);
    assert!(
        reports
            .iter()
            .all(|r| r.request.state() == RequestState::Orphaned)
    );
}

/// Panics while waiting on one specific request.
struct PanickingGateway {
    poisoned: HashSet<String>,
    inner: RecordingGateway,
}

#[async_trait]
impl ProviderGateway for PanickingGateway {
    async fn wait_until_fulfilled(&self, request_id: &str) -> Result<(), ProviderError> {
        assert!(
            !self.poisoned.contains(request_id),
            "gateway blew up on {request_id}"
        );
        self.inner.wait_until_fulfilled(request_id).await
    }

    async fn describe_spot_requests(
        &self,
        request_id: &str,
    ) -> Result<Vec<SpotRequestRecord>, ProviderError> {
        self.inner.describe_spot_requests(request_id).await
    }

    async fn describe_instances(&self, instance_id: &str) -> Result<Vec<Reservation>, ProviderError> {
        self.inner.describe_instances(instance_id).await
    }

    async fn create_tags(&self, resource_id: &str, tags: &[Tag]) -> Result<(), ProviderError> {
        self.inner.create_tags(resource_id, tags).await
    }
}

#[tokio::test]
async fn panicking_task_is_reported_without_losing_the_others() {
    let gateway = Arc::new(PanickingGateway {
        poisoned: HashSet::from(["sir-2".to_string()]),
        inner: RecordingGateway::new()
            .fulfilled("sir-1", "i-1")
            .fulfilled("sir-2", "i-2"),
    });
    let ctx = context(gateway, web_group());

    let reports = track_all(&ctx, pending(&["sir-1", "sir-2"])).await;

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].request.state(), RequestState::Tagged);

    assert_eq!(reports[1].request.id(), "sir-2");
    assert_eq!(reports[1].request.state(), RequestState::Failed);
    match &reports[1].result {
        Err(SpotRequestError::TaskAborted { request_id, reason }) => {
            assert_eq!(request_id, "sir-2");
            assert_eq!(reason, "task panicked");
        }
        other => panic!("expected TaskAborted, got {other:?}"),
    }
}

// ── Deadline ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn deadline_keeps_finished_reports_and_aborts_the_rest() {
    let gateway = Arc::new(StallingGateway::new(
        RecordingGateway::new().fulfilled("sir-1", "i-1"),
        &["sir-2"],
    ));
    let ctx = context(gateway.clone(), web_group());

    let reports = track_all_until(
        &ctx,
        pending(&["sir-1", "sir-2"]),
        Some(Duration::from_millis(200)),
    )
    .await;

    assert_eq!(reports.len(), 2);

    assert_eq!(reports[0].request.state(), RequestState::Tagged);
    assert_eq!(reports[0].request.instance_id(), Some("i-1"));
    assert_eq!(
        reports[0].result.as_ref().ok(),
        Some(&FulfillmentOutcome::Tagged {
            instance_id: "i-1".to_string(),
            tags_applied: 2,
        })
    );

    assert_eq!(reports[1].request.id(), "sir-2");
    assert_eq!(reports[1].request.state(), RequestState::Failed);
    match &reports[1].result {
        Err(SpotRequestError::TaskAborted { request_id, reason }) => {
            assert_eq!(request_id, "sir-2");
            assert_eq!(reason, "deadline exceeded");
        }
        other => panic!("expected TaskAborted, got {other:?}"),
    }

    // The stalled request never got past waiting.
    assert!(gateway.inner.tags_on("sir-2").is_empty());
}

#[tokio::test]
async fn deadline_that_is_not_reached_changes_nothing() {
    let gateway = Arc::new(RecordingGateway::new().fulfilled("sir-1", "i-1"));
    let ctx = context(gateway, web_group());

    let reports = track_all_until(&ctx, pending(&["sir-1"]), Some(Duration::from_secs(30))).await;

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].request.state(), RequestState::Tagged);
}
