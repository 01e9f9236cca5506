//! Application services — use-case orchestration.
//!
//! Each service module implements one stage of taking a spot request from
//! `pending` to `tagged` by composing domain logic with port trait calls.
//! Services import only from `crate::domain` and `crate::application` —
//! never from `crate::infra`, `crate::commands`, or `crate::output`.

pub mod fulfillment;
pub mod request_tag;
pub mod resolver;
pub mod tag_propagation;
pub mod tracker;
