//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::application::services::tracker::{FulfillmentOutcome, TrackReport};
use crate::output::OutputContext;

/// Renders tracking results as human-readable terminal output.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// One line per request: `✓` tagged, `⚠` orphaned, `✗` failed.
    pub fn render_reports(&self, reports: &[TrackReport]) {
        for report in reports {
            let id = report.request.id();
            let id = id.style(self.ctx.styles.bold);
            match &report.result {
                Ok(FulfillmentOutcome::Tagged { .. }) => {
                    self.ctx.success(&format!("{id}  {}", summary(report)));
                }
                Ok(FulfillmentOutcome::Orphaned(_)) => {
                    self.ctx.warn(&format!("{id}  {}", summary(report)));
                }
                Err(_) => self.ctx.error(&format!("{id}  {}", summary(report))),
            }
        }
        if reports.len() > 1 {
            self.ctx.info(&totals(reports));
        }
    }

    /// Confirm a single tag applied to a request.
    pub fn render_tagged(&self, request_id: &str, key: &str, value: &str) {
        self.ctx.success(&format!(
            "{}  tagged {key}={value}",
            request_id.style(self.ctx.styles.bold)
        ));
    }
}

/// Plain-text description of a report, without the request id.
#[must_use]
pub fn summary(report: &TrackReport) -> String {
    match &report.result {
        Ok(FulfillmentOutcome::Tagged {
            instance_id,
            tags_applied,
        }) => {
            let noun = if *tags_applied == 1 { "tag" } else { "tags" };
            format!("tagged {instance_id} ({tags_applied} {noun})")
        }
        Ok(FulfillmentOutcome::Orphaned(reason)) => format!("orphaned: {reason}"),
        Err(e) => format!("{} failed: {e}", e.kind()),
    }
}

/// Per-outcome counts across a batch, e.g. `3 spot requests: 2 tagged, 0 orphaned, 1 failed`.
#[must_use]
pub fn totals(reports: &[TrackReport]) -> String {
    let (mut tagged, mut orphaned, mut failed) = (0, 0, 0);
    for report in reports {
        match &report.result {
            Ok(FulfillmentOutcome::Tagged { .. }) => tagged += 1,
            Ok(FulfillmentOutcome::Orphaned(_)) => orphaned += 1,
            Err(_) => failed += 1,
        }
    }
    format!(
        "{} spot requests: {tagged} tagged, {orphaned} orphaned, {failed} failed",
        reports.len()
    )
}
