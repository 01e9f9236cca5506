//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, the
//! `aws` CLI gateway, and configuration file loading.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod aws_cli;
pub mod command_runner;
pub mod config;

pub use aws_cli::AwsCliGateway;
pub use command_runner::TokioCommandRunner;
pub use config::YamlConfigStore;
