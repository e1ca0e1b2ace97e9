//! Error taxonomy for the switch monitor.
//!
//! - [`HardwareError`]: the sensor line could not be configured or read
//! - [`NotifyError`] / [`LogError`]: an external delivery failed
//! - [`PolicyViolation`]: a switch invariant was broken (programming error)
//! - [`MonitorError`]: anything escaping a single tick
//! - [`SupervisorError`]: why the supervised loop gave up

use std::path::PathBuf;

use thiserror::Error;

/// Failure to configure or read a physical input line.
#[derive(Debug, Error)]
pub enum HardwareError {
    #[error("sensor {sensor_id} read before it was configured")]
    NotConfigured { sensor_id: u32 },

    #[error("sensor {sensor_id} unavailable at {path}: {source}")]
    Io {
        sensor_id: u32,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("sensor {sensor_id} returned unexpected value {value:?}")]
    InvalidValue { sensor_id: u32, value: String },

    #[error("sensor {sensor_id} failed: {message}")]
    Other { sensor_id: u32, message: String },
}

/// Failure to deliver a notification message.
#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    #[error("notification transport failed: {0}")]
    Transport(String),

    #[error("notification rejected: HTTP {status} - {reason}")]
    Rejected { status: u16, reason: String },
}

/// Failure to append an event record to the external sink.
#[derive(Debug, Clone, Error)]
pub enum LogError {
    #[error("event log transport failed: {0}")]
    Transport(String),

    #[error("event log rejected: HTTP {status} - {reason}")]
    Rejected { status: u16, reason: String },
}

/// A switch invariant was found broken after a tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invariant violated on switch '{switch}': {detail}")]
pub struct PolicyViolation {
    pub switch: String,
    pub detail: String,
}

/// An error that escaped `SwitchMonitor::tick`.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Hardware(#[from] HardwareError),

    #[error(transparent)]
    Policy(#[from] PolicyViolation),

    #[error("failed to build monitor: {0}")]
    Setup(String),
}

impl MonitorError {
    /// Whether the supervisor may restart after this error.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, MonitorError::Policy(_))
    }
}

/// Why the supervised loop stopped without a clean shutdown.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("monitor crashed {attempts} times, giving up: {last_error}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last_error: MonitorError,
    },

    #[error("monitor stopped on unrecoverable error: {0}")]
    Fatal(#[source] MonitorError),
}
