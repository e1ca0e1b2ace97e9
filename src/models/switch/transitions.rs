use chrono::{DateTime, Utc};

use super::types::{Switch, SwitchState};
use crate::error::PolicyViolation;

impl Switch {
    /// Closed -> Open. Arms the backoff at `backoff_secs` measured from `now`.
    pub(crate) fn mark_open(&mut self, now: DateTime<Utc>, backoff_secs: f64) {
        self.state = SwitchState::Open;
        self.open_since = Some(now);
        self.current_backoff_secs = Some(backoff_secs);
        self.backoff_anchor = Some(now);
    }

    /// Record a "still open" reminder: move the checkpoint and re-arm the backoff.
    pub(crate) fn mark_reminded(&mut self, now: DateTime<Utc>, next_backoff_secs: f64) {
        self.current_backoff_secs = Some(next_backoff_secs);
        self.backoff_anchor = Some(now);
    }

    /// Open -> Closed. Clears everything that only exists while open.
    pub(crate) fn mark_closed(&mut self) {
        self.state = SwitchState::Closed;
        self.open_since = None;
        self.current_backoff_secs = None;
        self.backoff_anchor = None;
    }

    /// Check that open-only fields are present exactly when open.
    pub fn check_invariants(&self) -> Result<(), PolicyViolation> {
        let open = self.state == SwitchState::Open;
        let fields = [
            ("open_since", self.open_since.is_some()),
            ("current_backoff_secs", self.current_backoff_secs.is_some()),
            ("backoff_anchor", self.backoff_anchor.is_some()),
        ];

        for (field, present) in fields {
            if present != open {
                return Err(self.violation(format!(
                    "{field} is {} while {}",
                    if present { "set" } else { "unset" },
                    self.state
                )));
            }
        }

        if let Some(backoff) = self.current_backoff_secs {
            if backoff.is_nan() || backoff <= 0.0 {
                return Err(self.violation(format!("backoff {backoff} is not positive")));
            }
        }

        Ok(())
    }

    pub(crate) fn violation(&self, detail: String) -> PolicyViolation {
        PolicyViolation {
            switch: self.name.clone(),
            detail,
        }
    }
}
