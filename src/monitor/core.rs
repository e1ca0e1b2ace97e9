//! Core SwitchMonitor implementation

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::clock::TimeSource;
use crate::error::MonitorError;
use crate::models::{LogRecord, Switch, SwitchEvent};
use crate::notify::{EventLogger, Notifier};
use crate::policy::{Decision, NotificationPolicy};
use crate::sensor::SensorInput;

use super::events::{DeliveryFailure, TickOutcome};

/// Drives one switch: reads its sensor, applies the notification policy and
/// hands the resulting messages and records to the collaborators.
pub struct SwitchMonitor {
    switch: Switch,
    sensor: Box<dyn SensorInput>,
    clock: Arc<dyn TimeSource>,
    policy: NotificationPolicy,
    notifier: Arc<dyn Notifier>,
    event_logger: Arc<dyn EventLogger>,
}

impl SwitchMonitor {
    pub fn new(
        switch: Switch,
        sensor: Box<dyn SensorInput>,
        clock: Arc<dyn TimeSource>,
        notifier: Arc<dyn Notifier>,
        event_logger: Arc<dyn EventLogger>,
    ) -> Self {
        Self {
            switch,
            sensor,
            clock,
            policy: NotificationPolicy::default(),
            notifier,
            event_logger,
        }
    }

    pub fn with_policy(mut self, policy: NotificationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn switch(&self) -> &Switch {
        &self.switch
    }

    /// Read the sensor once and advance the state machine.
    ///
    /// Sensor failures and broken invariants escape as errors. Delivery
    /// failures do not: they are reported in the outcome and the state change
    /// stands.
    pub fn tick(&mut self) -> Result<TickOutcome, MonitorError> {
        self.sensor.configure()?;
        let active = self.sensor.read()?;
        let now = self.clock.now();

        let decision = self.policy.decide(&self.switch, active, now)?;
        let outcome = match self.apply(decision, now) {
            Some(event) => self.dispatch(active, event, now),
            None => TickOutcome::idle(active),
        };

        self.switch.check_invariants()?;
        Ok(outcome)
    }

    /// Update the switch for `decision` and return the event to report.
    fn apply(&mut self, decision: Decision, now: DateTime<Utc>) -> Option<SwitchEvent> {
        match decision {
            Decision::Idle => None,
            Decision::Open { backoff_secs } => {
                self.switch.mark_open(now, backoff_secs);
                Some(SwitchEvent::Opened { at: now })
            }
            Decision::Remind {
                elapsed_open_secs,
                next_backoff_secs,
            } => {
                self.switch.mark_reminded(now, next_backoff_secs);
                Some(SwitchEvent::StillOpen {
                    elapsed_secs: elapsed_open_secs,
                    next_backoff_secs,
                })
            }
            Decision::Close => {
                self.switch.mark_closed();
                Some(SwitchEvent::Closed { at: now })
            }
        }
    }

    /// Notify, and log transitions. Each call is attempted regardless of the other.
    fn dispatch(&self, active: bool, event: SwitchEvent, now: DateTime<Utc>) -> TickOutcome {
        let name = self.switch.name();
        let message = self
            .switch
            .kind()
            .format_message(name, &event, self.switch.timezone());
        let event_name = event.event_name(name);
        info!(switch = name, event = %event_name, %message, "switch event");

        let mut failures = Vec::new();

        match self.notifier.send(&message) {
            Ok(ack) => debug!(switch = name, id = ?ack.id, "notification delivered"),
            Err(e) => {
                warn!(switch = name, event = %event_name, error = %e, "notification failed");
                failures.push(DeliveryFailure::Notify(e));
            }
        }

        if event.is_transition() {
            let record = LogRecord::new(name, &event, now);
            if let Err(e) = self.event_logger.record(&record) {
                warn!(switch = name, event = %event_name, error = %e, "event log failed");
                failures.push(DeliveryFailure::Log(e));
            }
        }

        TickOutcome {
            active,
            event: Some(event),
            message: Some(message),
            failures,
        }
    }
}

impl std::fmt::Debug for SwitchMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwitchMonitor")
            .field("switch", &self.switch)
            .field("sensor_id", &self.sensor.sensor_id())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
