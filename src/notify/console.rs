//! Dry-run backends that only write to the process log.

use tracing::info;

use super::{Ack, EventLogger, Notifier};
use crate::error::{LogError, NotifyError};
use crate::models::LogRecord;

/// Logs notifications instead of delivering them.
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn send(&self, message: &str) -> Result<Ack, NotifyError> {
        info!(target: "sentinel::notify", %message, "notification");
        Ok(Ack::default())
    }
}

/// Writes event records to the process log.
#[derive(Debug, Clone, Default)]
pub struct TracingEventLogger;

impl EventLogger for TracingEventLogger {
    fn record(&self, record: &LogRecord) -> Result<(), LogError> {
        info!(
            target: "sentinel::events",
            trigger_name = %record.trigger_name,
            event_name = %record.event_name,
            time = %record.time,
            "event"
        );
        Ok(())
    }
}
