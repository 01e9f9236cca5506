//! Domain layer — request lifecycle, tag set rules, and typed errors.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod error;
pub mod request;
pub mod tags;

pub use error::{ProviderError, SpotRequestError, TransitionError};
pub use request::{OrphanReason, RequestState, SpotInstanceRequest};
pub use tags::{LAUNCHED_FOR_GROUP_TAG, instance_tags};
