use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sentinel::commands::common::ConfigOverrides;
use sentinel::config::NotifyBackend;
use sentinel::models::NotifyTimezone;
use sentinel::validation::{clap_name_validator, clap_threshold_validator};

#[derive(Parser)]
#[command(name = "sentinel")]
#[command(about = "Door contact monitor with escalating open reminders", long_about = None)]
#[command(version)]
#[command(subcommand_help_heading = "Commands")]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Monitor the switch and send notifications (runs until Ctrl+C)
    Run {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Configure the sensor and print one reading
    Read {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML (secrets masked)
    Show {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print the default config file location
    Path,
}

/// Overrides layered on top of the config file and environment
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to a config file (default: <config dir>/sentinel/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Switch name used in event names and messages
    #[arg(long, value_parser = clap_name_validator)]
    pub name: Option<String>,

    /// GPIO line the contact is wired to
    #[arg(short, long)]
    pub pin: Option<u32>,

    /// Seconds open before the first reminder
    #[arg(short, long, value_parser = clap_threshold_validator)]
    pub threshold: Option<f64>,

    /// Timezone for message times (America/Chicago, UTC, +HH:MM, -HHMM)
    #[arg(long, allow_hyphen_values = true)]
    pub timezone: Option<NotifyTimezone>,

    /// Notification backend (console, webhook, twilio)
    #[arg(long)]
    pub notify: Option<NotifyBackend>,

    /// Total monitor starts before giving up
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Only monitor during this daily window, e.g. 22:00-06:00
    #[arg(long)]
    pub window: Option<String>,
}

impl From<ConfigArgs> for ConfigOverrides {
    fn from(args: ConfigArgs) -> Self {
        Self {
            config_path: args.config,
            name: args.name,
            pin: args.pin,
            threshold_secs: args.threshold,
            timezone: args.timezone,
            notify: args.notify,
            max_attempts: args.max_attempts,
            window: args.window,
        }
    }
}
