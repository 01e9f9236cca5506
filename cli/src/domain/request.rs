//! Spot instance request lifecycle.
//!
//! Pure types only. The application layer drives the transitions; this
//! module only decides which ones are legal.

use std::fmt;

use serde::Serialize;

use crate::domain::error::TransitionError;

/// Lifecycle state of a single spot instance request.
///
/// ```text
/// pending ──wait ok──▶ fulfilled ──instance tagged──▶ tagged
///    │                    ├──nothing resolvable──▶ orphaned
///    │                    └──resolve/tag error───▶ failed
///    └──wait error──▶ failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestState {
    Pending,
    Fulfilled,
    Tagged,
    Orphaned,
    Failed,
}

impl RequestState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Tagged | Self::Orphaned | Self::Failed)
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Fulfilled | Self::Failed)
                | (Self::Fulfilled, Self::Tagged | Self::Orphaned | Self::Failed)
        )
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fulfilled => "fulfilled",
            Self::Tagged => "tagged",
            Self::Orphaned => "orphaned",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a fulfilled request was left untagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanReason {
    /// Describing the request returned no records.
    RequestNotVisible,
    /// The request record carries no instance id.
    NoInstanceBound,
    /// Describing the bound instance returned no reservations.
    InstanceNotVisible,
}

impl fmt::Display for OrphanReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RequestNotVisible => "spot request not visible",
            Self::NoInstanceBound => "no instance bound to spot request",
            Self::InstanceNotVisible => "bound instance not visible",
        })
    }
}

/// A spot instance request tracked by this controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotInstanceRequest {
    id: String,
    region: String,
    group: String,
    instance_id: Option<String>,
    state: RequestState,
}

impl SpotInstanceRequest {
    /// A freshly created request, still `pending`.
    pub fn new(id: impl Into<String>, region: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            region: region.into(),
            group: group.into(),
            instance_id: None,
            state: RequestState::Pending,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Name of the owning fleet group.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    #[must_use]
    pub fn instance_id(&self) -> Option<&str> {
        self.instance_id.as_deref()
    }

    #[must_use]
    pub fn state(&self) -> RequestState {
        self.state
    }

    /// Move to `next`.
    ///
    /// # Errors
    ///
    /// Returns an error if the lifecycle does not allow the move.
    pub fn transition(&mut self, next: RequestState) -> Result<(), TransitionError> {
        if !self.state.can_transition_to(next) {
            return Err(self.transition_error(next));
        }
        self.state = next;
        Ok(())
    }

    /// Record the instance the provider bound to this request.
    ///
    /// # Errors
    ///
    /// Returns an error unless the request is `fulfilled` and not yet bound.
    pub fn bind_instance(&mut self, instance_id: impl Into<String>) -> Result<(), TransitionError> {
        if self.state != RequestState::Fulfilled || self.instance_id.is_some() {
            return Err(self.transition_error(RequestState::Fulfilled));
        }
        self.instance_id = Some(instance_id.into());
        Ok(())
    }

    /// Mark the request `failed`. No-op once the request is terminal.
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            self.state = RequestState::Failed;
        }
    }

    fn transition_error(&self, to: RequestState) -> TransitionError {
        TransitionError {
            request_id: self.id.clone(),
            from: self.state,
            to,
        }
    }
}
