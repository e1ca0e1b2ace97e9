use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::event::SwitchEvent;
use crate::models::timezone::NotifyTimezone;

/// Open/closed state of a switch
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SwitchState {
    #[default]
    Closed,
    Open,
}

impl std::fmt::Display for SwitchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwitchState::Closed => write!(f, "closed"),
            SwitchState::Open => write!(f, "open"),
        }
    }
}

/// The kind of sensor a switch models. Owns the wording of notifications.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SwitchKind {
    /// A door contact (default)
    #[default]
    Door,
    /// Any other binary contact, described by its switch name
    Generic,
}

impl SwitchKind {
    /// Human-readable message for an event.
    ///
    /// Open and close times are shown in `timezone`; reminders show the raw
    /// number of seconds the switch has been open.
    pub fn format_message(
        &self,
        name: &str,
        event: &SwitchEvent,
        timezone: &NotifyTimezone,
    ) -> String {
        match (self, event) {
            (SwitchKind::Door, SwitchEvent::Opened { at }) => {
                format!("The door was opened at {}.", timezone.format_time(*at))
            }
            (SwitchKind::Door, SwitchEvent::StillOpen { elapsed_secs, .. }) => {
                format!("The door has been open for {elapsed_secs} seconds.")
            }
            (SwitchKind::Door, SwitchEvent::Closed { at }) => {
                format!("The door was closed at {}.", timezone.format_time(*at))
            }
            (SwitchKind::Generic, SwitchEvent::Opened { at }) => {
                format!("{name} opened at {}.", timezone.format_time(*at))
            }
            (SwitchKind::Generic, SwitchEvent::StillOpen { elapsed_secs, .. }) => {
                format!("{name} has been open for {elapsed_secs} seconds.")
            }
            (SwitchKind::Generic, SwitchEvent::Closed { at }) => {
                format!("{name} closed at {}.", timezone.format_time(*at))
            }
        }
    }
}

impl std::fmt::Display for SwitchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwitchKind::Door => write!(f, "door"),
            SwitchKind::Generic => write!(f, "generic"),
        }
    }
}

/// Rejected switch construction parameters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SwitchError {
    #[error("invalid switch name: {0}")]
    InvalidName(String),
    #[error("invalid threshold: {0}")]
    InvalidThreshold(String),
}

/// A monitored binary sensor and its notification state.
///
/// `open_since`, `current_backoff_secs` and `backoff_anchor` are all present
/// exactly when the switch is open. Only the owning monitor mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct Switch {
    pub(crate) name: String,
    pub(crate) sensor_id: u32,
    pub(crate) base_threshold_secs: f64,
    pub(crate) kind: SwitchKind,
    pub(crate) timezone: NotifyTimezone,
    pub(crate) state: SwitchState,
    pub(crate) open_since: Option<DateTime<Utc>>,
    pub(crate) current_backoff_secs: Option<f64>,
    /// Checkpoint the backoff interval is measured from: the open instant,
    /// then the instant of the latest reminder.
    pub(crate) backoff_anchor: Option<DateTime<Utc>>,
}
