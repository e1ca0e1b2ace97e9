//! Configuration resolution shared by every command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::{NotifyBackend, SentinelConfig};
use crate::models::NotifyTimezone;

/// Command-line overrides, applied after the config file and environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub name: Option<String>,
    pub pin: Option<u32>,
    pub threshold_secs: Option<f64>,
    pub timezone: Option<NotifyTimezone>,
    pub notify: Option<NotifyBackend>,
    pub max_attempts: Option<u32>,
    pub window: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut SentinelConfig) {
        if let Some(name) = &self.name {
            config.switch.name = name.clone();
        }
        if let Some(pin) = self.pin {
            config.switch.pin = Some(pin);
        }
        if let Some(secs) = self.threshold_secs {
            config.switch.threshold_secs = secs;
        }
        if let Some(tz) = self.timezone {
            config.switch.timezone = tz;
        }
        if let Some(backend) = self.notify {
            config.notify.backend = backend;
        }
        if let Some(max) = self.max_attempts {
            config.supervisor.max_attempts = max;
        }
        if let Some(window) = &self.window {
            config.schedule.window = Some(window.clone());
        }
    }
}

/// Defaults, file, environment, then `overrides`; validated.
pub fn load_config(overrides: &ConfigOverrides) -> Result<SentinelConfig> {
    let mut config = SentinelConfig::load(overrides.config_path.as_deref())?;
    config
        .apply_env()
        .context("Failed to apply environment overrides")?;
    overrides.apply(&mut config);
    config.validate().context("Invalid configuration")?;
    debug!(config = ?config.redacted(), "configuration resolved");
    Ok(config)
}
