//! SMS notifications through the Twilio Messages API.

use std::fmt;
use std::time::Duration;

use anyhow::{bail, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::client::{create_http_client, rejection};
use super::{Ack, Notifier};
use crate::error::NotifyError;

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";
const MASK: &str = "********";

/// Account credentials and phone numbers (E.164, e.g. `+15551234567`).
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwilioCredentials {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl TwilioCredentials {
    /// Names of the fields that are still missing.
    pub fn missing(&self) -> Vec<&'static str> {
        let fields = [
            ("account_sid", &self.account_sid),
            ("auth_token", &self.auth_token),
            ("from", &self.from),
            ("to", &self.to),
        ];
        fields
            .into_iter()
            .filter(|(_, v)| v.as_deref().is_none_or(str::is_empty))
            .map(|(name, _)| name)
            .collect()
    }
}

impl fmt::Debug for TwilioCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwilioCredentials")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &self.auth_token.as_ref().map(|_| MASK))
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

#[derive(Clone)]
struct Account {
    sid: String,
    token: String,
    from: String,
    to: String,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("sid", &self.sid)
            .field("token", &MASK)
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

/// Sends each notification as an SMS.
#[derive(Debug, Clone)]
pub struct TwilioNotifier {
    client: Client,
    account: Account,
    base_url: String,
}

impl TwilioNotifier {
    pub fn new(credentials: &TwilioCredentials, timeout: Duration) -> Result<Self> {
        let missing = credentials.missing();
        if !missing.is_empty() {
            bail!("Twilio credentials incomplete, missing: {}", missing.join(", "));
        }

        let field = |v: &Option<String>| v.clone().unwrap_or_default();
        Ok(Self {
            client: create_http_client(timeout)?,
            account: Account {
                sid: field(&credentials.account_sid),
                token: field(&credentials.auth_token),
                from: field(&credentials.from),
                to: field(&credentials.to),
            },
            base_url: TWILIO_API_BASE.to_string(),
        })
    }

    /// Point the notifier at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            self.base_url.trim_end_matches('/'),
            self.account.sid
        )
    }
}

impl Notifier for TwilioNotifier {
    fn send(&self, message: &str) -> Result<Ack, NotifyError> {
        let form = [
            ("To", self.account.to.as_str()),
            ("From", self.account.from.as_str()),
            ("Body", message),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account.sid, Some(&self.account.token))
            .form(&form)
            .send()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        if let Some((status, reason)) = rejection(&response) {
            return Err(NotifyError::Rejected { status, reason });
        }

        let id = response
            .json::<serde_json::Value>()
            .ok()
            .and_then(|body| body.get("sid").and_then(|v| v.as_str()).map(String::from));
        Ok(Ack { id })
    }
}
