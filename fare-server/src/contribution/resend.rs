//! Resend email delivery.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Notifier;
use super::error::ContributionError;

const DEFAULT_BASE_URL: &str = "https://api.resend.com";

/// An outgoing email.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Email {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Configuration for the Resend client.
#[derive(Debug, Clone)]
pub struct ResendConfig {
    pub api_key: String,
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ResendConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[derive(Debug, Deserialize)]
struct ResendErrorBody {
    message: String,
}

#[derive(Debug, Clone)]
pub struct ResendClient {
    http: reqwest::Client,
    api_key: String,
    emails_url: String,
}

impl ResendClient {
    pub fn new(config: ResendConfig) -> Result<Self, ContributionError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key,
            emails_url: format!("{}/emails", config.base_url.trim_end_matches('/')),
        })
    }
}

impl Notifier for ResendClient {
    async fn send(&self, email: &Email) -> Result<(), ContributionError> {
        debug!(subject = %email.subject, "sending email");
        let response = self
            .http
            .post(&self.emails_url)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await
            .map_err(|e| ContributionError::Notify(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ResendErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or_else(|_| format!("status {}", status.as_u16()));
        Err(ContributionError::Notify(message))
    }
}
