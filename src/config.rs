//! Runtime configuration.
//!
//! Values are layered: built-in defaults, then the TOML file, then
//! environment variables, then command-line overrides applied by the CLI.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::constants::{
    http, BACKOFF_GROWTH_FACTOR, DEFAULT_GPIO_ROOT, DEFAULT_MAX_ATTEMPTS, DEFAULT_RESTART_DELAY, DEFAULT_SWITCH_NAME,
    DEFAULT_THRESHOLD_SECS,
};
use crate::models::{NotifyTimezone, Switch, SwitchKind};
use crate::notify::{
    ConsoleNotifier, EventLogger, Notifier, TracingEventLogger, TwilioCredentials,
    TwilioNotifier, WebhookEventLogger, WebhookNotifier,
};
use crate::policy::NotificationPolicy;
use crate::sensor::SysfsGpio;
use crate::supervisor::{ScheduleGate, SupervisorConfig};
use crate::validation::{validate_switch_name, validate_threshold_secs};

pub const ENV_PIN: &str = "SENTINEL_PIN";
pub const ENV_TIMEZONE: &str = "SENTINEL_TIMEZONE";
/// Unprefixed names read when the `SENTINEL_` ones are unset.
pub const ENV_PIN_ALIAS: &str = "PIN";
pub const ENV_TIMEZONE_ALIAS: &str = "TIMEZONE";
pub const ENV_TWILIO_ACCOUNT_SID: &str = "TWILIO_ACCOUNT_SID";
pub const ENV_TWILIO_AUTH_TOKEN: &str = "TWILIO_AUTH_TOKEN";
pub const ENV_TWILIO_SOURCE_PHONE: &str = "TWILIO_SOURCE_PHONE";
pub const ENV_TWILIO_DESTINATION_PHONE: &str = "TWILIO_DESTINATION_PHONE";

/// Top-level configuration file contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SentinelConfig {
    pub switch: SwitchSection,
    pub sensor: SensorSection,
    pub supervisor: SupervisorSection,
    pub schedule: ScheduleSection,
    pub notify: NotifySection,
    pub log: LogSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwitchSection {
    pub name: String,
    pub kind: SwitchKind,
    /// GPIO line the contact is wired to. Required to run.
    pub pin: Option<u32>,
    pub threshold_secs: f64,
    /// Reminder interval multiplier applied after each reminder.
    pub backoff_growth: f64,
    pub timezone: NotifyTimezone,
}

impl Default for SwitchSection {
    fn default() -> Self {
        Self {
            name: DEFAULT_SWITCH_NAME.to_string(),
            kind: SwitchKind::default(),
            pin: None,
            threshold_secs: DEFAULT_THRESHOLD_SECS,
            backoff_growth: BACKOFF_GROWTH_FACTOR,
            timezone: NotifyTimezone::utc(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SensorSection {
    pub gpio_root: PathBuf,
    /// Treat a low line as "open".
    pub active_low: bool,
}

impl Default for SensorSection {
    fn default() -> Self {
        Self {
            gpio_root: PathBuf::from(DEFAULT_GPIO_ROOT),
            active_low: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SupervisorSection {
    pub max_attempts: u32,
    pub restart_delay_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for SupervisorSection {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            restart_delay_ms: DEFAULT_RESTART_DELAY.as_millis() as u64,
            poll_interval_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleSection {
    /// Daily `HH:MM-HH:MM` window in the switch timezone. Unset means always.
    pub window: Option<String>,
}

/// Where notifications go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyBackend {
    /// Log the message through tracing only
    #[default]
    Console,
    Webhook,
    Twilio,
}

impl fmt::Display for NotifyBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyBackend::Console => write!(f, "console"),
            NotifyBackend::Webhook => write!(f, "webhook"),
            NotifyBackend::Twilio => write!(f, "twilio"),
        }
    }
}

impl FromStr for NotifyBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "console" => Ok(NotifyBackend::Console),
            "webhook" => Ok(NotifyBackend::Webhook),
            "twilio" => Ok(NotifyBackend::Twilio),
            _ => bail!("Invalid notify backend: {s}. Use: console, webhook, twilio"),
        }
    }
}

/// Where event records go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogBackend {
    #[default]
    Console,
    Webhook,
}

impl fmt::Display for LogBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogBackend::Console => write!(f, "console"),
            LogBackend::Webhook => write!(f, "webhook"),
        }
    }
}

impl FromStr for LogBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "console" => Ok(LogBackend::Console),
            "webhook" => Ok(LogBackend::Webhook),
            _ => bail!("Invalid log backend: {s}. Use: console, webhook"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotifySection {
    pub backend: NotifyBackend,
    /// Endpoint for the webhook backend.
    pub url: Option<String>,
    pub timeout_secs: u64,
    pub twilio: TwilioCredentials,
}

impl Default for NotifySection {
    fn default() -> Self {
        Self {
            backend: NotifyBackend::default(),
            url: None,
            timeout_secs: http::REQUEST_TIMEOUT_SECS,
            twilio: TwilioCredentials::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSection {
    pub backend: LogBackend,
    pub url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            backend: LogBackend::default(),
            url: None,
            timeout_secs: http::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl SentinelConfig {
    /// Default location: `<config dir>/sentinel/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sentinel").join("config.toml"))
    }

    /// Load from `path`, or from the default location when it exists.
    ///
    /// A missing default file yields the built-in defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid TOML configuration")
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Empty values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let first = |keys: [&'static str; 2]| {
            keys.into_iter()
                .find_map(|key| get(key).map(|value| (key, value)))
        };

        if let Some((key, pin)) = first([ENV_PIN, ENV_PIN_ALIAS]) {
            let pin = pin
                .trim()
                .parse()
                .with_context(|| format!("{key} must be a GPIO line number, got '{pin}'"))?;
            self.switch.pin = Some(pin);
        }
        if let Some((key, tz)) = first([ENV_TIMEZONE, ENV_TIMEZONE_ALIAS]) {
            self.switch.timezone = tz.parse().with_context(|| format!("Invalid {key}"))?;
        }

        let twilio = &mut self.notify.twilio;
        let overrides = [
            (ENV_TWILIO_ACCOUNT_SID, &mut twilio.account_sid),
            (ENV_TWILIO_AUTH_TOKEN, &mut twilio.auth_token),
            (ENV_TWILIO_SOURCE_PHONE, &mut twilio.from),
            (ENV_TWILIO_DESTINATION_PHONE, &mut twilio.to),
        ];
        for (key, slot) in overrides {
            if let Some(value) = get(key) {
                *slot = Some(value);
            }
        }

        Ok(())
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        validate_switch_name(&self.switch.name)?;
        validate_threshold_secs(self.switch.threshold_secs)?;
        let growth = self.switch.backoff_growth;
        if !growth.is_finite() || growth < 1.0 {
            bail!("switch.backoff_growth must be a finite number of at least 1, got {growth}");
        }

        if self.supervisor.max_attempts == 0 {
            bail!("supervisor.max_attempts must be at least 1");
        }
        self.schedule_gate()?;

        match self.notify.backend {
            NotifyBackend::Webhook if self.notify.url.is_none() => {
                bail!("notify.url is required for the webhook backend")
            }
            NotifyBackend::Twilio => {
                let missing = self.notify.twilio.missing();
                if !missing.is_empty() {
                    bail!(
                        "Twilio backend is missing: {}. Set them under [notify.twilio] or via TWILIO_* environment variables",
                        missing.join(", ")
                    );
                }
            }
            _ => {}
        }
        if self.log.backend == LogBackend::Webhook && self.log.url.is_none() {
            bail!("log.url is required for the webhook backend");
        }
        if self.notify.timeout_secs == 0 {
            bail!("notify.timeout_secs must be at least 1");
        }
        if self.log.timeout_secs == 0 {
            bail!("log.timeout_secs must be at least 1");
        }

        Ok(())
    }

    pub fn supervisor_config(&self) -> SupervisorConfig {
        SupervisorConfig {
            max_attempts: self.supervisor.max_attempts,
            restart_delay: Duration::from_millis(self.supervisor.restart_delay_ms),
            poll_interval: Duration::from_millis(self.supervisor.poll_interval_ms),
        }
    }

    pub fn schedule_gate(&self) -> Result<ScheduleGate> {
        match self.schedule.window.as_deref() {
            None => Ok(ScheduleGate::Always),
            Some(window) => ScheduleGate::window(window, self.switch.timezone)
                .context("Invalid schedule.window"),
        }
    }

    fn pin(&self) -> Result<u32> {
        self.switch.pin.with_context(|| {
            format!("No sensor pin configured. Set switch.pin or {ENV_PIN}")
        })
    }

    /// A fresh, closed switch.
    pub fn build_switch(&self) -> Result<Switch> {
        Switch::builder(&self.switch.name, self.pin()?)
            .threshold_secs(self.switch.threshold_secs)
            .kind(self.switch.kind)
            .timezone(self.switch.timezone)
            .build()
            .context("Invalid switch configuration")
    }

    pub fn build_policy(&self) -> NotificationPolicy {
        NotificationPolicy::with_growth_factor(self.switch.backoff_growth)
    }

    pub fn build_sensor(&self) -> Result<SysfsGpio> {
        Ok(SysfsGpio::with_root(self.pin()?, &self.sensor.gpio_root)
            .active_low(self.sensor.active_low))
    }

    pub fn build_notifier(&self) -> Result<Arc<dyn Notifier>> {
        let timeout = Duration::from_secs(self.notify.timeout_secs);
        let notifier: Arc<dyn Notifier> = match self.notify.backend {
            NotifyBackend::Console => Arc::new(ConsoleNotifier),
            NotifyBackend::Webhook => {
                let url = self
                    .notify
                    .url
                    .as_deref()
                    .context("notify.url is required for the webhook backend")?;
                Arc::new(WebhookNotifier::new(url, &self.switch.name, timeout)?)
            }
            NotifyBackend::Twilio => Arc::new(TwilioNotifier::new(&self.notify.twilio, timeout)?),
        };
        Ok(notifier)
    }

    pub fn build_event_logger(&self) -> Result<Arc<dyn EventLogger>> {
        let logger: Arc<dyn EventLogger> = match self.log.backend {
            LogBackend::Console => Arc::new(TracingEventLogger),
            LogBackend::Webhook => {
                let url = self
                    .log
                    .url
                    .as_deref()
                    .context("log.url is required for the webhook backend")?;
                Arc::new(WebhookEventLogger::new(
                    url,
                    Duration::from_secs(self.log.timeout_secs),
                )?)
            }
        };
        Ok(logger)
    }

    /// Copy with secrets replaced, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.notify.twilio.auth_token.is_some() {
            copy.notify.twilio.auth_token = Some("********".to_string());
        }
        copy
    }
}
