//! In-memory backends that keep everything they receive.
//!
//! Both can be told to fail a number of upcoming calls, which is how delivery
//! outages are simulated in tests.

use std::sync::{Mutex, MutexGuard};

use super::{Ack, EventLogger, Notifier};
use crate::error::{LogError, NotifyError};
use crate::models::LogRecord;

#[derive(Debug)]
struct Inbox<T> {
    items: Vec<T>,
    failures_pending: usize,
}

impl<T> Default for Inbox<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            failures_pending: 0,
        }
    }
}

fn lock<T>(m: &Mutex<Inbox<T>>) -> MutexGuard<'_, Inbox<T>> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// Stores delivered messages.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    inbox: Mutex<Inbox<String>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `count` sends.
    pub fn fail_next(&self, count: usize) {
        lock(&self.inbox).failures_pending = count;
    }

    /// Messages delivered so far.
    pub fn messages(&self) -> Vec<String> {
        lock(&self.inbox).items.clone()
    }
}

impl Notifier for MemoryNotifier {
    fn send(&self, message: &str) -> Result<Ack, NotifyError> {
        let mut inbox = lock(&self.inbox);
        if inbox.failures_pending > 0 {
            inbox.failures_pending -= 1;
            return Err(NotifyError::Transport("simulated outage".to_string()));
        }
        inbox.items.push(message.to_string());
        Ok(Ack {
            id: Some(format!("mem-{}", inbox.items.len())),
        })
    }
}

/// Stores recorded events.
#[derive(Debug, Default)]
pub struct MemoryEventLogger {
    inbox: Mutex<Inbox<LogRecord>>,
}

impl MemoryEventLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `count` records.
    pub fn fail_next(&self, count: usize) {
        lock(&self.inbox).failures_pending = count;
    }

    /// Records accepted so far.
    pub fn records(&self) -> Vec<LogRecord> {
        lock(&self.inbox).items.clone()
    }
}

impl EventLogger for MemoryEventLogger {
    fn record(&self, record: &LogRecord) -> Result<(), LogError> {
        let mut inbox = lock(&self.inbox);
        if inbox.failures_pending > 0 {
            inbox.failures_pending -= 1;
            return Err(LogError::Transport("simulated outage".to_string()));
        }
        inbox.items.push(record.clone());
        Ok(())
    }
}
