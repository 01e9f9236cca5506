//! `fleetspot track` — wait for spot requests and tag their instances.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use fleetspot_common::FleetspotConfig;

use crate::application::RequestContext;
use crate::application::services::tracker::track_all_until;
use crate::commands::{TargetArgs, production_context};
use crate::domain::SpotInstanceRequest;
use crate::output::{HumanRenderer, OutputContext, json};

/// Arguments for the track command.
#[derive(Args, Debug)]
pub struct TrackArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Give up waiting after this many seconds
    #[arg(long, value_name = "SECS")]
    pub deadline: Option<u64>,

    /// Spot instance request ids, e.g. sir-0123abcd
    #[arg(required = true, value_name = "REQUEST_ID")]
    pub request_ids: Vec<String>,
}

/// Run the track command against the production `aws` CLI gateway.
///
/// # Errors
///
/// Returns an error if the target cannot be resolved or any request fails.
pub async fn run(
    out: &OutputContext,
    config: &FleetspotConfig,
    args: TrackArgs,
    json: bool,
) -> Result<()> {
    let ctx = production_context(config, &args.target)?;
    execute(out, &ctx, args.request_ids, args.deadline, json).await
}

/// Track `request_ids` under `ctx` and render the reports.
///
/// # Errors
///
/// Returns an error if any request fails, including requests still
/// unfinished when the deadline passes. Orphaned requests are not failures.
pub async fn execute(
    out: &OutputContext,
    ctx: &RequestContext,
    request_ids: Vec<String>,
    deadline: Option<u64>,
    json: bool,
) -> Result<()> {
    let requests: Vec<SpotInstanceRequest> = request_ids
        .into_iter()
        .map(|id| SpotInstanceRequest::new(id, ctx.region(), ctx.group().name.clone()))
        .collect();
    let total = requests.len();

    let reports = track_all_until(ctx, requests, deadline.map(Duration::from_secs)).await;

    if json {
        println!("{}", json::format_reports(&reports)?);
    } else {
        HumanRenderer::new(out).render_reports(&reports);
    }

    let failed = reports.iter().filter(|r| r.is_failure()).count();
    if failed > 0 {
        anyhow::bail!("{failed} of {total} spot requests failed");
    }
    Ok(())
}

