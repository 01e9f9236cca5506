//! Command implementations

pub mod tag;
pub mod track;
pub mod version;

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use fleetspot_common::{FleetGroup, FleetspotConfig};

use crate::application::RequestContext;
use crate::infra::AwsCliGateway;

/// Which fleet group and region a command acts for.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Owning fleet group, as named in the config file
    #[arg(long)]
    pub group: String,

    /// Provider region (falls back to `region` in the config file)
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,
}

/// Resolve the region and fleet group a command targets.
///
/// # Errors
///
/// Returns an error if no region is given anywhere or the group is not
/// defined in the config.
pub fn resolve_target(config: &FleetspotConfig, target: &TargetArgs) -> Result<(String, FleetGroup)> {
    let region = target
        .region
        .clone()
        .or_else(|| config.region.clone())
        .filter(|r| !r.is_empty())
        .ok_or_else(|| {
            anyhow::anyhow!("no region given. Pass --region, set AWS_REGION, or set `region` in the config file")
        })?;

    let group = config.group(&target.group).cloned().ok_or_else(|| {
        anyhow::anyhow!(
            "unknown fleet group '{}'. Define it under `groups` in the config file",
            target.group
        )
    })?;

    Ok((region, group))
}

/// Build a `RequestContext` backed by the production `aws` CLI gateway.
///
/// # Errors
///
/// See [`resolve_target`].
pub fn production_context(config: &FleetspotConfig, target: &TargetArgs) -> Result<RequestContext> {
    let (region, group) = resolve_target(config, target)?;
    let gateway = Arc::new(AwsCliGateway::from_config(region.clone(), &config.aws));
    Ok(RequestContext::new(region, gateway, Arc::new(group)))
}
