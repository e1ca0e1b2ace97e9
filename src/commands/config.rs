use anyhow::Result;
use colored::Colorize;

use super::common::{load_config, ConfigOverrides};
use crate::config::SentinelConfig;

/// Print the effective configuration as TOML, secrets masked.
pub fn show(overrides: &ConfigOverrides) -> Result<()> {
    let config = load_config(overrides)?;
    print!("{}", config.redacted().to_toml()?);
    Ok(())
}

/// Print where the default config file is looked up.
pub fn path() -> Result<()> {
    match SentinelConfig::default_path() {
        Some(path) if path.exists() => println!("{}", path.display()),
        Some(path) => println!("{} {}", path.display(), "(not found)".dimmed()),
        None => println!("{}", "No config directory on this platform".yellow()),
    }
    Ok(())
}
