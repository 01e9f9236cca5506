//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, or `std::process`.

use thiserror::Error;

use crate::domain::request::RequestState;

// ── Provider errors ───────────────────────────────────────────────────────────

/// A failure reported by the provider gateway.
///
/// `Display` is the provider's message, unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

// ── Spot request errors ───────────────────────────────────────────────────────

/// Errors surfaced while taking a spot request from `pending` to `tagged`.
///
/// The three provider-backed variants are transparent: their message is the
/// provider's message. The variant records which stage failed.
#[derive(Debug, Error)]
pub enum SpotRequestError {
    /// The request never reached fulfillment.
    #[error(transparent)]
    Wait(ProviderError),

    /// Describing the request or its instance failed outright.
    #[error(transparent)]
    Resolve(ProviderError),

    /// A create-tags call failed.
    #[error(transparent)]
    Tag(ProviderError),

    #[error("spot request {request_id} was already processed (state: {state})")]
    AlreadyProcessed {
        request_id: String,
        state: RequestState,
    },

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("tracking task for spot request {request_id} aborted: {reason}")]
    TaskAborted { request_id: String, reason: String },
}

impl SpotRequestError {
    /// Short machine-readable stage name, used in JSON output.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Wait(_) => "wait",
            Self::Resolve(_) => "resolve",
            Self::Tag(_) => "tag",
            Self::AlreadyProcessed { .. } => "already_processed",
            Self::Transition(_) => "transition",
            Self::TaskAborted { .. } => "task_aborted",
        }
    }

    /// The underlying provider error, if this failure came from the gateway.
    #[must_use]
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            Self::Wait(e) | Self::Resolve(e) | Self::Tag(e) => Some(e),
            _ => None,
        }
    }
}

// ── State machine errors ──────────────────────────────────────────────────────

/// A request state change that the lifecycle does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("spot request {request_id} cannot move from {from} to {to}")]
pub struct TransitionError {
    pub request_id: String,
    pub from: RequestState,
    pub to: RequestState,
}
