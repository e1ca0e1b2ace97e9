//! JSON webhook backends.
//!
//! Notifications are POSTed as `{"source": ..., "message": ...}`; event
//! records as `{"trigger_name": ..., "event_name": ..., "time": ...}`.
//! Any non-2xx response is a delivery failure.

use std::time::Duration;

use anyhow::Result;
use reqwest::blocking::Client;
use serde::Serialize;

use super::client::{create_http_client, rejection};
use super::{Ack, EventLogger, Notifier};
use crate::error::{LogError, NotifyError};
use crate::models::LogRecord;

#[derive(Serialize)]
struct NotifyPayload<'a> {
    source: &'a str,
    message: &'a str,
}

/// Posts notification messages to an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
    source: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, source: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: create_http_client(timeout)?,
            url: url.into(),
            source: source.into(),
        })
    }
}

impl Notifier for WebhookNotifier {
    fn send(&self, message: &str) -> Result<Ack, NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(&NotifyPayload {
                source: &self.source,
                message,
            })
            .send()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        if let Some((status, reason)) = rejection(&response) {
            return Err(NotifyError::Rejected { status, reason });
        }

        let id = response
            .json::<serde_json::Value>()
            .ok()
            .and_then(|body| body.get("id").and_then(|v| v.as_str()).map(String::from));
        Ok(Ack { id })
    }
}

/// Posts event records to an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct WebhookEventLogger {
    client: Client,
    url: String,
}

impl WebhookEventLogger {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: create_http_client(timeout)?,
            url: url.into(),
        })
    }
}

impl EventLogger for WebhookEventLogger {
    fn record(&self, record: &LogRecord) -> Result<(), LogError> {
        let response = self
            .client
            .post(&self.url)
            .json(record)
            .send()
            .map_err(|e| LogError::Transport(e.to_string()))?;

        if let Some((status, reason)) = rejection(&response) {
            return Err(LogError::Rejected { status, reason });
        }
        Ok(())
    }
}
