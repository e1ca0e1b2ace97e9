//! A sensor driven by a queue of canned readings.
//!
//! Used to exercise the monitor and the supervised loop without hardware.
//! The [`ScriptHandle`] stays with the caller so readings can be queued after
//! the sensor has been moved into a monitor.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use super::SensorInput;
use crate::error::HardwareError;

#[derive(Debug)]
enum Step {
    Reading(bool),
    Failure(String),
}

#[derive(Debug, Default)]
struct Script {
    steps: VecDeque<Step>,
    idle: bool,
    reads: u64,
}

/// Caller-side handle for queueing readings into a [`ScriptedSensor`].
#[derive(Debug, Clone, Default)]
pub struct ScriptHandle {
    script: Arc<Mutex<Script>>,
}

impl ScriptHandle {
    /// Queue a reading.
    pub fn push(&self, active: bool) -> &Self {
        self.lock().steps.push_back(Step::Reading(active));
        self
    }

    /// Queue the same reading `count` times.
    pub fn push_many(&self, active: bool, count: usize) -> &Self {
        let mut script = self.lock();
        for _ in 0..count {
            script.steps.push_back(Step::Reading(active));
        }
        drop(script);
        self
    }

    /// Queue a read failure.
    pub fn push_failure(&self, message: impl Into<String>) -> &Self {
        self.lock().steps.push_back(Step::Failure(message.into()));
        self
    }

    /// Reading returned once the queue is empty (initially `false`).
    pub fn set_idle(&self, active: bool) {
        self.lock().idle = active;
    }

    /// Readings still queued.
    pub fn remaining(&self) -> usize {
        self.lock().steps.len()
    }

    /// Total reads performed, failures included.
    pub fn reads(&self) -> u64 {
        self.lock().reads
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Sensor that replays a [`ScriptHandle`]'s queue.
#[derive(Debug)]
pub struct ScriptedSensor {
    sensor_id: u32,
    configured: bool,
    handle: ScriptHandle,
}

impl ScriptedSensor {
    pub fn new(sensor_id: u32) -> Self {
        Self::with_handle(sensor_id, ScriptHandle::default())
    }

    /// Build a sensor sharing an existing script, e.g. across monitor restarts.
    pub fn with_handle(sensor_id: u32, handle: ScriptHandle) -> Self {
        Self {
            sensor_id,
            configured: false,
            handle,
        }
    }

    pub fn handle(&self) -> ScriptHandle {
        self.handle.clone()
    }
}

impl SensorInput for ScriptedSensor {
    fn sensor_id(&self) -> u32 {
        self.sensor_id
    }

    fn configure(&mut self) -> Result<(), HardwareError> {
        self.configured = true;
        Ok(())
    }

    fn read(&mut self) -> Result<bool, HardwareError> {
        if !self.configured {
            return Err(HardwareError::NotConfigured {
                sensor_id: self.sensor_id,
            });
        }

        let mut script = self.handle.lock();
        script.reads += 1;
        match script.steps.pop_front() {
            Some(Step::Reading(active)) => Ok(active),
            Some(Step::Failure(message)) => Err(HardwareError::Other {
                sensor_id: self.sensor_id,
                message,
            }),
            None => Ok(script.idle),
        }
    }
}
