//! Notification and event log collaborators.
//!
//! The monitor only sees the [`Notifier`] and [`EventLogger`] traits; the
//! concrete backends are chosen by configuration and injected at construction.

mod client;
mod console;
mod memory;
#[cfg(test)]
mod test_server;
mod twilio;
mod webhook;

pub use client::create_http_client;
pub use console::{ConsoleNotifier, TracingEventLogger};
pub use memory::{MemoryEventLogger, MemoryNotifier};
pub use twilio::{TwilioCredentials, TwilioNotifier};
pub use webhook::{WebhookEventLogger, WebhookNotifier};

use crate::error::{LogError, NotifyError};
use crate::models::LogRecord;

/// Delivery acknowledgement from a notification backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ack {
    /// Provider-assigned message id, when the backend returns one.
    pub id: Option<String>,
}

/// Delivers a human-readable message to the end user.
pub trait Notifier: Send + Sync {
    fn send(&self, message: &str) -> Result<Ack, NotifyError>;
}

/// Appends structured event records to an external sink.
pub trait EventLogger: Send + Sync {
    fn record(&self, record: &LogRecord) -> Result<(), LogError>;
}
