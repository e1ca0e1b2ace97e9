//! Outcome of a single monitor tick

use crate::error::{LogError, NotifyError};
use crate::models::SwitchEvent;

/// A side effect that was attempted and failed during a tick.
#[derive(Debug, Clone)]
pub enum DeliveryFailure {
    Notify(NotifyError),
    Log(LogError),
}

impl std::fmt::Display for DeliveryFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryFailure::Notify(e) => write!(f, "notify: {e}"),
            DeliveryFailure::Log(e) => write!(f, "log: {e}"),
        }
    }
}

/// What happened on one tick.
#[derive(Debug, Clone, Default)]
pub struct TickOutcome {
    /// Raw sensor reading for this tick.
    pub active: bool,
    /// Event emitted, if any.
    pub event: Option<SwitchEvent>,
    /// Message handed to the notifier, if any.
    pub message: Option<String>,
    /// Notify/log calls that failed. The state change stands regardless.
    pub failures: Vec<DeliveryFailure>,
}

impl TickOutcome {
    pub fn idle(active: bool) -> Self {
        Self {
            active,
            ..Default::default()
        }
    }

    pub fn is_idle(&self) -> bool {
        self.event.is_none()
    }

    pub fn fully_delivered(&self) -> bool {
        self.failures.is_empty()
    }
}
