//! Shared gateway doubles for unit tests.
//!
//! `RecordingGateway` models a small provider: which requests are fulfilled
//! and bound to which instance, which instances are describable, and which
//! calls fail. Every call is recorded in order, and `create_tags` applies
//! overwrite semantics to an in-memory tag store.

#![allow(dead_code, clippy::expect_used)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fleetspot_cli::application::{ProviderGateway, RequestContext, Reservation, SpotRequestRecord};
use fleetspot_cli::domain::ProviderError;
use fleetspot_common::{FleetGroup, GroupTag, Tag};

/// One recorded gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Wait(String),
    DescribeRequests(String),
    DescribeInstances(String),
    CreateTags(String, Vec<Tag>),
}

#[derive(Default)]
pub struct RecordingGateway {
    /// request id → bound instance id. Absent ids describe as empty.
    bindings: HashMap<String, Option<String>>,
    /// Instance ids that describe as one reservation.
    visible_instances: HashSet<String>,
    wait_errors: HashMap<String, ProviderError>,
    describe_requests_error: Option<ProviderError>,
    describe_instances_error: Option<ProviderError>,
    /// resource id → create-tags error.
    tag_errors: HashMap<String, ProviderError>,
    calls: Mutex<Vec<Call>>,
    tag_store: Mutex<BTreeMap<String, BTreeMap<String, String>>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// `request_id` is fulfilled with a describable `instance_id`.
    pub fn fulfilled(mut self, request_id: &str, instance_id: &str) -> Self {
        self.bindings
            .insert(request_id.to_string(), Some(instance_id.to_string()));
        self.visible_instances.insert(instance_id.to_string());
        self
    }

    /// `request_id` describes as a record with no instance id.
    pub fn unbound(mut self, request_id: &str) -> Self {
        self.bindings.insert(request_id.to_string(), None);
        self
    }

    /// `request_id` is bound to `instance_id`, but the instance describes as empty.
    pub fn bound_to_invisible(mut self, request_id: &str, instance_id: &str) -> Self {
        self.bindings
            .insert(request_id.to_string(), Some(instance_id.to_string()));
        self
    }

    pub fn wait_fails(mut self, request_id: &str, message: &str) -> Self {
        self.wait_errors
            .insert(request_id.to_string(), ProviderError::new(message));
        self
    }

    pub fn describe_requests_fails(mut self, message: &str) -> Self {
        self.describe_requests_error = Some(ProviderError::new(message));
        self
    }

    pub fn describe_instances_fails(mut self, message: &str) -> Self {
        self.describe_instances_error = Some(ProviderError::new(message));
        self
    }

    pub fn tagging_fails(mut self, resource_id: &str, message: &str) -> Self {
        self.tag_errors
            .insert(resource_id.to_string(), ProviderError::new(message));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("lock").clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    pub fn describe_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::DescribeRequests(_) | Call::DescribeInstances(_)))
    }

    pub fn create_tag_calls(&self) -> Vec<(String, Vec<Tag>)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::CreateTags(resource, tags) => Some((resource, tags)),
                _ => None,
            })
            .collect()
    }

    /// Tags currently stored on `resource_id`, sorted by key.
    pub fn tags_on(&self, resource_id: &str) -> Vec<(String, String)> {
        self.tag_store
            .lock()
            .expect("lock")
            .get(resource_id)
            .map(|tags| tags.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("lock").push(call);
    }
}

#[async_trait]
impl ProviderGateway for RecordingGateway {
    async fn wait_until_fulfilled(&self, request_id: &str) -> Result<(), ProviderError> {
        self.record(Call::Wait(request_id.to_string()));
        match self.wait_errors.get(request_id) {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    async fn describe_spot_requests(
        &self,
        request_id: &str,
    ) -> Result<Vec<SpotRequestRecord>, ProviderError> {
        self.record(Call::DescribeRequests(request_id.to_string()));
        if let Some(e) = &self.describe_requests_error {
            return Err(e.clone());
        }
        Ok(self
            .bindings
            .get(request_id)
            .map(|instance_id| SpotRequestRecord {
                instance_id: instance_id.clone(),
                state: Some("active".to_string()),
            })
            .into_iter()
            .collect())
    }

    async fn describe_instances(&self, instance_id: &str) -> Result<Vec<Reservation>, ProviderError> {
        self.record(Call::DescribeInstances(instance_id.to_string()));
        if let Some(e) = &self.describe_instances_error {
            return Err(e.clone());
        }
        if self.visible_instances.contains(instance_id) {
            Ok(vec![Reservation {
                reservation_id: Some(format!("r-{instance_id}")),
                instance_ids: vec![instance_id.to_string()],
            }])
        } else {
            Ok(Vec::new())
        }
    }

    async fn create_tags(&self, resource_id: &str, tags: &[Tag]) -> Result<(), ProviderError> {
        self.record(Call::CreateTags(resource_id.to_string(), tags.to_vec()));
        if let Some(e) = self.tag_errors.get(resource_id) {
            return Err(e.clone());
        }
        let mut store = self.tag_store.lock().expect("lock");
        let entry = store.entry(resource_id.to_string()).or_default();
        for tag in tags {
            entry.insert(tag.key.clone(), tag.value.clone());
        }
        Ok(())
    }
}

// ── Fixtures ──────────────────────────────────────────────────────────────────

pub fn web_group() -> FleetGroup {
    FleetGroup::new(
        "web",
        vec![
            GroupTag::new("Owner", "team-a", true),
            GroupTag::new("Env", "prod", false),
        ],
    )
}

/// A context over `gateway` for `group` in `us-east-1`.
pub fn context(gateway: Arc<dyn ProviderGateway>, group: FleetGroup) -> RequestContext {
    RequestContext::new("us-east-1", gateway, Arc::new(group))
}

/// Wraps a `RecordingGateway`; waiting on any `stalled` request never returns.
pub struct StallingGateway {
    pub stalled: HashSet<String>,
    pub inner: RecordingGateway,
}

impl StallingGateway {
    pub fn new(inner: RecordingGateway, stalled: &[&str]) -> Self {
        Self {
            stalled: stalled.iter().map(|s| (*s).to_string()).collect(),
            inner,
        }
    }
}

#[async_trait]
impl ProviderGateway for StallingGateway {
    async fn wait_until_fulfilled(&self, request_id: &str) -> Result<(), ProviderError> {
        if self.stalled.contains(request_id) {
            std::future::pending::<()>().await;
        }
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
