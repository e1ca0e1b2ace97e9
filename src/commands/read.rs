use anyhow::{Context, Result};
use colored::Colorize;

use super::common::{load_config, ConfigOverrides};
use crate::sensor::SensorInput;

/// Configure the sensor and print a single reading.
pub fn execute(overrides: &ConfigOverrides) -> Result<()> {
    let config = load_config(overrides)?;
    let mut sensor = config.build_sensor()?;

    sensor.configure().context("Failed to configure sensor")?;
    let active = sensor.read().context("Failed to read sensor")?;

    let state = if active {
        "open".yellow().bold()
    } else {
        "closed".green().bold()
    };
    println!(
        "{} (pin {}): {state}",
        config.switch.name.bold(),
        sensor.sensor_id()
    );
    Ok(())
}
