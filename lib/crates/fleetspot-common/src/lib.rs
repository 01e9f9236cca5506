pub mod config;
pub mod types;

pub use config::{AwsCliConfig, FleetspotConfig};
pub use types::*;
