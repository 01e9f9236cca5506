use serde::{Deserialize, Serialize};

use crate::types::FleetGroup;

/// Top-level configuration stored in `~/.fleetspot/config.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetspotConfig {
    /// How the `aws` CLI is invoked.
    pub aws: AwsCliConfig,

    /// Region used when `--region` is not given.
    pub region: Option<String>,

    /// Fleet groups whose tags are propagated onto spot instances.
    pub groups: Vec<FleetGroup>,
}

impl FleetspotConfig {
    /// Look up a fleet group by name.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&FleetGroup> {
        self.groups.iter().find(|g| g.name == name)
    }
}

/// `aws` CLI invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsCliConfig {
    /// Program to run (default: `aws`)
    #[serde(default = "default_program")]
    pub program: String,

    /// Named profile passed as `--profile`
    #[serde(default)]
    pub profile: Option<String>,

    /// Timeout for describe and tag calls (default: 60s)
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,

    /// Timeout for the fulfillment waiter (default: 900s)
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,
}

fn default_program() -> String {
    "aws".to_string()
}

fn default_command_timeout_secs() -> u64 {
    60
}

fn default_wait_timeout_secs() -> u64 {
    900
}

impl Default for AwsCliConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            profile: None,
            command_timeout_secs: default_command_timeout_secs(),
            wait_timeout_secs: default_wait_timeout_secs(),
        }
    }
}
