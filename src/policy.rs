//! Notification policy: decides what a reading means for a switch.
//!
//! The policy is pure. It looks at the switch, the latest reading and the
//! current time and returns a [`Decision`]; the monitor applies it.
//!
//! Reminder schedule with a 30s base: 30s after opening, then 60s after that
//! reminder, then 120s after that one, and so on. The interval doubles with
//! no cap.

use chrono::{DateTime, Utc};

use crate::error::PolicyViolation;
use crate::models::constants::BACKOFF_GROWTH_FACTOR;
use crate::models::{Switch, SwitchState};

/// What the monitor should do after a reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// Nothing to report.
    Idle,
    /// Closed -> Open: notify and log "opened", arm the backoff.
    Open { backoff_secs: f64 },
    /// Still open past the backoff: notify "still open", re-arm with the grown interval.
    Remind {
        elapsed_open_secs: f64,
        next_backoff_secs: f64,
    },
    /// Open -> Closed: notify and log "closed".
    Close,
}

/// Backoff-based reminder policy.
#[derive(Debug, Clone, Copy)]
pub struct NotificationPolicy {
    growth_factor: f64,
}

impl Default for NotificationPolicy {
    fn default() -> Self {
        Self {
            growth_factor: BACKOFF_GROWTH_FACTOR,
        }
    }
}

impl NotificationPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Multiply the backoff by `factor` after each reminder instead of 2.
    pub fn with_growth_factor(factor: f64) -> Self {
        Self {
            growth_factor: factor,
        }
    }

    /// Backoff armed when a switch opens.
    pub fn initial_backoff(&self, switch: &Switch) -> f64 {
        switch.base_threshold_secs()
    }

    /// Backoff armed after a reminder fires.
    pub fn next_backoff(&self, current_secs: f64) -> f64 {
        current_secs * self.growth_factor
    }

    /// Decide what `active` means for `switch` at `now`.
    ///
    /// Transitions win over reminders: the tick that opens a switch never
    /// also reminds, whatever the elapsed time.
    pub fn decide(
        &self,
        switch: &Switch,
        active: bool,
        now: DateTime<Utc>,
    ) -> Result<Decision, PolicyViolation> {
        match (switch.state(), active) {
            (SwitchState::Closed, false) => Ok(Decision::Idle),
            (SwitchState::Closed, true) => Ok(Decision::Open {
                backoff_secs: self.initial_backoff(switch),
            }),
            (SwitchState::Open, false) => Ok(Decision::Close),
            (SwitchState::Open, true) => {
                let (Some(backoff), Some(elapsed), Some(elapsed_open)) = (
                    switch.current_backoff_secs(),
                    switch.elapsed_since_anchor_secs(now),
                    switch.elapsed_open_secs(now),
                ) else {
                    return Err(switch.violation(
                        "open switch is missing its backoff or open time".to_string(),
                    ));
                };

                if elapsed >= backoff {
                    Ok(Decision::Remind {
                        elapsed_open_secs: elapsed_open,
                        next_backoff_secs: self.next_backoff(backoff),
                    })
                } else {
                    Ok(Decision::Idle)
                }
            }
        }
    }
}
