use chrono::{DateTime, Utc};

use super::types::{Switch, SwitchError, SwitchKind, SwitchState};
use crate::models::constants::DEFAULT_THRESHOLD_SECS;
use crate::models::timezone::NotifyTimezone;
use crate::validation::{validate_switch_name, validate_threshold_secs};

/// Builder for [`Switch`]. Every switch it builds starts closed.
#[derive(Debug, Clone)]
pub struct SwitchBuilder {
    name: String,
    sensor_id: u32,
    threshold_secs: f64,
    kind: SwitchKind,
    timezone: NotifyTimezone,
}

impl SwitchBuilder {
    pub fn threshold_secs(mut self, secs: f64) -> Self {
        self.threshold_secs = secs;
        self
    }

    pub fn kind(mut self, kind: SwitchKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn timezone(mut self, timezone: NotifyTimezone) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn build(self) -> Result<Switch, SwitchError> {
        validate_switch_name(&self.name).map_err(|e| SwitchError::InvalidName(e.to_string()))?;
        validate_threshold_secs(self.threshold_secs)
            .map_err(|e| SwitchError::InvalidThreshold(e.to_string()))?;

        Ok(Switch {
            name: self.name,
            sensor_id: self.sensor_id,
            base_threshold_secs: self.threshold_secs,
            kind: self.kind,
            timezone: self.timezone,
            state: SwitchState::Closed,
            open_since: None,
            current_backoff_secs: None,
            backoff_anchor: None,
        })
    }
}

impl Switch {
    pub fn builder(name: impl Into<String>, sensor_id: u32) -> SwitchBuilder {
        SwitchBuilder {
            name: name.into(),
            sensor_id,
            threshold_secs: DEFAULT_THRESHOLD_SECS,
            kind: SwitchKind::default(),
            timezone: NotifyTimezone::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sensor_id(&self) -> u32 {
        self.sensor_id
    }

    pub fn base_threshold_secs(&self) -> f64 {
        self.base_threshold_secs
    }

    pub fn kind(&self) -> SwitchKind {
        self.kind
    }

    pub fn timezone(&self) -> &NotifyTimezone {
        &self.timezone
    }

    pub fn state(&self) -> SwitchState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == SwitchState::Open
    }

    pub fn open_since(&self) -> Option<DateTime<Utc>> {
        self.open_since
    }

    pub fn current_backoff_secs(&self) -> Option<f64> {
        self.current_backoff_secs
    }

    pub fn backoff_anchor(&self) -> Option<DateTime<Utc>> {
        self.backoff_anchor
    }

    /// Seconds the switch has been open at `now`, rounded to hundredths for display.
    pub fn elapsed_open_secs(&self, now: DateTime<Utc>) -> Option<f64> {
        self.open_since
            .map(|since| (seconds_between(since, now) * 100.0).round() / 100.0)
    }

    /// Seconds since the last backoff checkpoint at `now`. Not rounded: this is
    /// what the backoff is compared against.
    pub fn elapsed_since_anchor_secs(&self, now: DateTime<Utc>) -> Option<f64> {
        self.backoff_anchor.map(|anchor| seconds_between(anchor, now))
    }
}

/// Whole milliseconds between two instants, in seconds. Truncates, so a
/// partial millisecond never counts toward a threshold.
fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    to.signed_duration_since(from).num_milliseconds() as f64 / 1000.0
}
