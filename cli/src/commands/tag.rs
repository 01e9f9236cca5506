//! `fleetspot tag` — set one tag on a spot request.

use anyhow::Result;
use clap::Args;
use fleetspot_common::FleetspotConfig;

use crate::application::RequestContext;
use crate::application::services::request_tag::tag_request;
use crate::commands::{TargetArgs, production_context};
use crate::output::{HumanRenderer, OutputContext};

/// Arguments for the tag command.
#[derive(Args, Debug)]
pub struct TagArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Spot instance request id
    #[arg(long = "request", value_name = "REQUEST_ID")]
    pub request_id: String,

    /// Tag key
    #[arg(long)]
    pub key: String,

    /// Tag value (defaults to the group name)
    #[arg(long)]
    pub value: Option<String>,
}

/// Run the tag command against the production `aws` CLI gateway.
///
/// # Errors
///
/// Returns an error if the target cannot be resolved or the provider
/// rejects the tag.
pub async fn run(
    out: &OutputContext,
    config: &FleetspotConfig,
    args: TagArgs,
    json: bool,
) -> Result<()> {
    let ctx = production_context(config, &args.target)?;
    execute(out, &ctx, &args.request_id, &args.key, args.value.as_deref(), json).await
}

/// Tag `request_id` with `key`, valued `value` or the group name.
///
/// # Errors
///
/// Returns the provider error unchanged if tagging fails.
pub async fn execute(
    out: &OutputContext,
    ctx: &RequestContext,
    request_id: &str,
    key: &str,
    value: Option<&str>,
    json: bool,
) -> Result<()> {
    let value = value.unwrap_or(ctx.group().name.as_str());
    tag_request(ctx.gateway(), request_id, key, value).await?;

    if json {
        let obj = serde_json::json!({
            "request_id": request_id,
            "key": key,
            "value": value,
        });
        println!("{obj}");
    } else {
        HumanRenderer::new(out).render_tagged(request_id, key, value);
    }
    Ok(())
}
