//! Configuration for the supervised loop

use std::time::Duration;

use crate::models::constants::{DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL, DEFAULT_RESTART_DELAY};

/// Restart budget and pacing for the supervised loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorConfig {
    /// Total number of times the monitor loop may be started.
    pub max_attempts: u32,
    /// Fixed delay between a crash and the next start.
    pub restart_delay: Duration,
    /// Delay between ticks. Zero means as fast as the sensor allows.
    pub poll_interval: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            restart_delay: DEFAULT_RESTART_DELAY,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}
