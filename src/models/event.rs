//! Events produced by a switch and the records sent to the event log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::constants::LOG_TIME_FORMAT;

/// Something worth telling the user about.
#[derive(Debug, Clone, PartialEq)]
pub enum SwitchEvent {
    /// The switch went from closed to open.
    Opened { at: DateTime<Utc> },
    /// The switch has stayed open past the current backoff interval.
    StillOpen {
        /// Seconds since the switch opened, rounded to hundredths.
        elapsed_secs: f64,
        /// Backoff interval armed for the next reminder.
        next_backoff_secs: f64,
    },
    /// The switch went from open to closed.
    Closed { at: DateTime<Utc> },
}

impl SwitchEvent {
    /// Suffix appended to the switch name to form the event name.
    pub fn suffix(&self) -> &'static str {
        match self {
            SwitchEvent::Opened { .. } => "opened",
            SwitchEvent::StillOpen { .. } => "open_long",
            SwitchEvent::Closed { .. } => "closed",
        }
    }

    /// Event name as sent to notification and log backends, e.g. `front_door_opened`.
    pub fn event_name(&self, switch_name: &str) -> String {
        format!("{switch_name}_{}", self.suffix())
    }

    /// Open and close transitions are logged; reminders are only notified.
    pub fn is_transition(&self) -> bool {
        !matches!(self, SwitchEvent::StillOpen { .. })
    }
}

/// A structured event record appended to the external log sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub trigger_name: String,
    pub event_name: String,
    /// UTC timestamp in `LOG_TIME_FORMAT`.
    pub time: String,
}

impl LogRecord {
    pub fn new(switch_name: &str, event: &SwitchEvent, at: DateTime<Utc>) -> Self {
        Self {
            trigger_name: switch_name.to_string(),
            event_name: event.event_name(switch_name),
            time: format_log_time(at),
        }
    }
}

pub fn format_log_time(at: DateTime<Utc>) -> String {
    at.format(LOG_TIME_FORMAT).to_string()
}
