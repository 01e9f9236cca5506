//! Application layer — port trait definitions and use-case orchestration.
//!
//! This module depends only on `crate::domain` — never on `crate::infra`,
//! `crate::commands`, or `crate::output`.

pub mod context;
pub mod ports;
pub mod services;

pub use context::RequestContext;
pub use ports::{
    CommandRunner, ConfigStore, ProviderGateway, Reservation, SpotRequestRecord,
};
