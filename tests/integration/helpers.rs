//! Shared test helpers for supervised-loop integration tests

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

use sentinel::clock::ManualClock;
use sentinel::error::MonitorError;
use sentinel::models::{NotifyTimezone, Switch};
use sentinel::monitor::{SwitchMonitor, TickOutcome};
use sentinel::notify::{MemoryEventLogger, MemoryNotifier};
use sentinel::sensor::SensorInput;
use sentinel::supervisor::{ShutdownSignal, SupervisorConfig, TickObserver};

pub const PIN: u32 = 17;

/// 2024-04-02 17:00:00 UTC, noon at -05:00.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 2, 17, 0, 0).unwrap()
}

pub fn fast_supervisor(max_attempts: u32) -> SupervisorConfig {
    SupervisorConfig {
        max_attempts,
        restart_delay: Duration::ZERO,
        poll_interval: Duration::ZERO,
    }
}

/// Collaborators shared by every monitor a test builds.
pub struct Collaborators {
    pub clock: Arc<ManualClock>,
    pub notifier: Arc<MemoryNotifier>,
    pub events: Arc<MemoryEventLogger>,
    pub shutdown: ShutdownSignal,
}

impl Collaborators {
    pub fn new() -> Self {
        Self {
            clock: Arc::new(ManualClock::new(t0())),
            notifier: Arc::new(MemoryNotifier::new()),
            events: Arc::new(MemoryEventLogger::new()),
            shutdown: ShutdownSignal::new(),
        }
    }

    /// Build a monitor for a fresh `front_door` switch at -05:00.
    pub fn monitor(&self, sensor: Box<dyn SensorInput>) -> Result<SwitchMonitor, MonitorError> {
        let switch = Switch::builder("front_door", PIN)
            .timezone("-05:00".parse::<NotifyTimezone>().unwrap())
            .build()
            .map_err(|e| MonitorError::Setup(e.to_string()))?;
        Ok(SwitchMonitor::new(
            switch,
            sensor,
            self.clock.clone(),
            self.notifier.clone(),
            self.events.clone(),
        ))
    }

    /// Observer that advances the clock one second per tick, records every
    /// outcome and requests shutdown once `stop` returns true.
    pub fn stepping_observer<S>(
        &self,
        log: Arc<Mutex<Vec<(Switch, TickOutcome)>>>,
        stop: S,
    ) -> TickObserver
    where
        S: Fn(usize) -> bool + Send + 'static,
    {
        let clock = self.clock.clone();
        let shutdown = self.shutdown.clone();
        Box::new(move |switch: &Switch, outcome: &TickOutcome| {
            let mut log = log.lock().unwrap();
            log.push((switch.clone(), outcome.clone()));
            clock.advance_secs(1);
            if stop(log.len()) {
                shutdown.request();
            }
        })
    }
}

/// Lay out an exported input line under a fake sysfs root.
pub fn fake_gpio_line(root: &Path, pin: u32, value: &str) {
    let dir = root.join(format!("gpio{pin}"));
    fs::create_dir_all(&dir).expect("Failed to create gpio dir");
    fs::write(dir.join("direction"), "in\n").expect("Failed to write direction");
    fs::write(root.join("export"), "").expect("Failed to write export");
    set_gpio_value(root, pin, value);
}

pub fn set_gpio_value(root: &Path, pin: u32, value: &str) {
    fs::write(root.join(format!("gpio{pin}")).join("value"), format!("{value}\n"))
        .expect("Failed to write value");
}

pub fn remove_gpio_value(root: &Path, pin: u32) {
    fs::remove_file(root.join(format!("gpio{pin}")).join("value"))
        .expect("Failed to remove value");
}
