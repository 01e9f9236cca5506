//! JSON output helpers.
//!
//! `--json` prints one array of report objects for `track`, and an error
//! object when a command fails.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::services::tracker::{FulfillmentOutcome, TrackReport};
use crate::domain::{OrphanReason, RequestState};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Serializable view of one [`TrackReport`].
#[derive(Debug, Serialize)]
pub struct ReportView<'a> {
    pub request_id: &'a str,
    pub region: &'a str,
    pub group: &'a str,
    pub state: RequestState,
    pub instance_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags_applied: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orphan_reason: Option<OrphanReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorView>,
}

#[derive(Debug, Serialize)]
pub struct ErrorView {
    pub kind: &'static str,
    pub message: String,
}

impl<'a> From<&'a TrackReport> for ReportView<'a> {
    fn from(report: &'a TrackReport) -> Self {
        let request = &report.request;
        let mut view = ReportView {
            request_id: request.id(),
            region: request.region(),
            group: request.group(),
            state: request.state(),
            instance_id: request.instance_id(),
            tags_applied: None,
            orphan_reason: None,
            error: None,
        };
        match &report.result {
            Ok(FulfillmentOutcome::Tagged { tags_applied, .. }) => {
                view.tags_applied = Some(*tags_applied);
            }
            Ok(FulfillmentOutcome::Orphaned(reason)) => view.orphan_reason = Some(*reason),
            Err(e) => {
                view.error = Some(ErrorView {
                    kind: e.kind(),
                    message: e.to_string(),
                });
            }
        }
        view
    }
}

/// Pretty-printed JSON array of reports.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_reports(reports: &[TrackReport]) -> Result<String> {
    let views: Vec<ReportView<'_>> = reports.iter().map(ReportView::from).collect();
    serde_json::to_string_pretty(&views).context("JSON serialization failed")
}
