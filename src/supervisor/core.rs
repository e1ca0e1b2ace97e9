//! Core SupervisedLoop implementation

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::clock::{SystemClock, TimeSource};
use crate::error::{MonitorError, SupervisorError};
use crate::models::constants::SCHEDULE_IDLE_INTERVAL;
use crate::models::Switch;
use crate::monitor::{SwitchMonitor, TickOutcome};

use super::config::SupervisorConfig;
use super::retry::should_restart;
use super::schedule::ScheduleGate;
use super::shutdown::ShutdownSignal;

/// Called after every completed tick.
pub type TickObserver = Box<dyn FnMut(&Switch, &TickOutcome) + Send>;

/// Counters reported when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    /// Number of times a monitor was started.
    pub attempts: u32,
    /// Ticks completed across all attempts.
    pub ticks: u64,
    /// Restarts after a crash.
    pub restarts: u32,
}

/// Keeps a [`SwitchMonitor`] ticking and restarts it on failure.
///
/// Each attempt builds a fresh monitor through `factory`, so switch state
/// never survives a crash. Retryable errors restart the loop after
/// `restart_delay` until `max_attempts` total starts have been used.
pub struct SupervisedLoop<F>
where
    F: FnMut() -> Result<SwitchMonitor, MonitorError>,
{
    config: SupervisorConfig,
    factory: F,
    shutdown: ShutdownSignal,
    schedule: ScheduleGate,
    clock: Arc<dyn TimeSource>,
    observer: Option<TickObserver>,
}

impl<F> SupervisedLoop<F>
where
    F: FnMut() -> Result<SwitchMonitor, MonitorError>,
{
    pub fn new(config: SupervisorConfig, factory: F, shutdown: ShutdownSignal) -> Self {
        Self {
            config,
            factory,
            shutdown,
            schedule: ScheduleGate::Always,
            clock: Arc::new(SystemClock),
            observer: None,
        }
    }

    /// Skip ticks while `schedule` is inactive according to `clock`.
    pub fn with_schedule(mut self, schedule: ScheduleGate, clock: Arc<dyn TimeSource>) -> Self {
        self.schedule = schedule;
        self.clock = clock;
        self
    }

    pub fn with_observer(mut self, observer: TickObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Run until shutdown is requested or the monitor fails for good.
    pub fn run(&mut self) -> Result<LoopSummary, SupervisorError> {
        let mut summary = LoopSummary::default();

        loop {
            if self.shutdown.is_requested() {
                return Ok(summary);
            }

            summary.attempts += 1;
            info!(
                attempt = summary.attempts,
                max_attempts = self.config.max_attempts,
                "starting monitor"
            );

            let err = match self.run_attempt(&mut summary) {
                Ok(()) => {
                    info!(ticks = summary.ticks, "monitor stopped on shutdown request");
                    return Ok(summary);
                }
                Err(e) => e,
            };

            if !should_restart(&err, summary.attempts, self.config.max_attempts) {
                error!(attempt = summary.attempts, error = %err, "monitor failed, not restarting");
                if !err.is_retryable() {
                    return Err(SupervisorError::Fatal(err));
                }
                return Err(SupervisorError::RetriesExhausted {
                    attempts: summary.attempts,
                    last_error: err,
                });
            }

            warn!(
                attempt = summary.attempts,
                max_attempts = self.config.max_attempts,
                delay_ms = self.config.restart_delay.as_millis() as u64,
                error = %err,
                "monitor crashed, restarting"
            );
            summary.restarts += 1;

            if !self.shutdown.sleep(self.config.restart_delay) {
                return Ok(summary);
            }
        }
    }

    /// One monitor lifetime. `Ok` means shutdown was requested.
    fn run_attempt(&mut self, summary: &mut LoopSummary) -> Result<(), MonitorError> {
        let mut monitor = (self.factory)()?;
        debug!(?monitor, "monitor ready");

        while !self.shutdown.is_requested() {
            if !self.schedule.is_active(self.clock.now()) {
                self.shutdown.sleep(SCHEDULE_IDLE_INTERVAL);
                continue;
            }

            let outcome = monitor.tick()?;
            summary.ticks += 1;

            if let Some(observer) = self.observer.as_mut() {
                observer(monitor.switch(), &outcome);
            }

            if !self.config.poll_interval.is_zero() {
                self.shutdown.sleep(self.config.poll_interval);
            }
        }

        Ok(())
    }
}
