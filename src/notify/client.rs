//! HTTP client shared by the webhook and Twilio backends.
//!
//! Every request is bounded by a connect and a total timeout so a stalled
//! endpoint cannot block sensing for longer than the timeout.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::{Client, Response};

use crate::models::constants::http::CONNECT_TIMEOUT_SECS;

/// Create an HTTP client with the given total request timeout.
pub fn create_http_client(request_timeout: Duration) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS).min(request_timeout))
        .timeout(request_timeout)
        .user_agent(concat!("sentinel/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")
}

/// Status code and reason of an unsuccessful response.
pub(crate) fn rejection(response: &Response) -> Option<(u16, String)> {
    let status = response.status();
    if status.is_success() {
        return None;
    }
    Some((
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown error").to_string(),
    ))
}
