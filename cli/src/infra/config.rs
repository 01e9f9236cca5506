//! Infrastructure implementation of the `ConfigStore` port.

use std::path::PathBuf;

use anyhow::{Context, Result};
use fleetspot_common::FleetspotConfig;

use crate::application::ports::ConfigStore;

/// Environment variable overriding the configuration path.
pub const CONFIG_ENV: &str = "FLEETSPOT_CONFIG";

/// Production implementation of `ConfigStore` that reads a YAML file.
///
/// Path precedence: explicit path, then `FLEETSPOT_CONFIG`, then
/// `~/.fleetspot/config.yaml`.
#[derive(Debug, Default)]
pub struct YamlConfigStore {
    explicit: Option<PathBuf>,
}

impl YamlConfigStore {
    #[must_use]
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<FleetspotConfig> {
        let path = self.path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(FleetspotConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.explicit {
            return Ok(path.clone());
        }
        if let Ok(val) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".fleetspot").join("config.yaml"))
    }
}
