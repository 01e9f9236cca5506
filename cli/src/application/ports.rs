//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and `fleetspot_common` —
//! never from `crate::infra`, `crate::commands`, or `crate::output`.

use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use fleetspot_common::{FleetspotConfig, Tag};

use crate::domain::ProviderError;

// ── Value Types ───────────────────────────────────────────────────────────────

/// One record returned when describing a spot instance request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpotRequestRecord {
    /// Instance bound to the request, once fulfilled.
    pub instance_id: Option<String>,
    /// Provider state string, e.g. `"active"`.
    pub state: Option<String>,
}

/// A provider grouping of instances returned by an instance describe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reservation {
    pub reservation_id: Option<String>,
    pub instance_ids: Vec<String>,
}

// ── Provider Gateway Port ─────────────────────────────────────────────────────

/// The four provider operations the spot request tracker depends on.
///
/// Implementations are shared read-only across concurrent tracking tasks,
/// so they must be `Send + Sync` and hold no single-use state.
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// Block until the request is fulfilled or reaches a terminal failure.
    async fn wait_until_fulfilled(&self, request_id: &str) -> Result<(), ProviderError>;

    /// Describe one spot request. May return an empty list.
    async fn describe_spot_requests(
        &self,
        request_id: &str,
    ) -> Result<Vec<SpotRequestRecord>, ProviderError>;

    /// Describe one instance. May return an empty list.
    async fn describe_instances(&self, instance_id: &str) -> Result<Vec<Reservation>, ProviderError>;

    /// Apply all `tags` to `resource_id` in a single call.
    async fn create_tags(&self, resource_id: &str, tags: &[Tag]) -> Result<(), ProviderError>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading of the fleetspot configuration file.
pub trait ConfigStore {
    /// Load the configuration, returning defaults if no file exists.
    fn load(&self) -> Result<FleetspotConfig>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}
