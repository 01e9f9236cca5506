//! Explicit per-operation context: region, gateway handle, owning group.

use std::sync::Arc;

use fleetspot_common::FleetGroup;

use crate::application::ports::ProviderGateway;

/// Everything a tracking operation needs besides the request itself.
///
/// Cloning is cheap; each concurrent tracking task holds its own clone of
/// the shared, read-only gateway and group.
#[derive(Clone)]
pub struct RequestContext {
    region: String,
    gateway: Arc<dyn ProviderGateway>,
    group: Arc<FleetGroup>,
}

impl RequestContext {
    pub fn new(
        region: impl Into<String>,
        gateway: Arc<dyn ProviderGateway>,
        group: Arc<FleetGroup>,
    ) -> Self {
        Self {
            region: region.into(),
            gateway,
            group,
        }
    }

    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    #[must_use]
    pub fn gateway(&self) -> &dyn ProviderGateway {
        self.gateway.as_ref()
    }

    #[must_use]
    pub fn group(&self) -> &FleetGroup {
        &self.group
    }
}
