//! Escalation alert delivery.
//!
//! Dispatchers are advisory: the engine invokes them off the critical
//! path, bounds them with a timeout, and swallows failures. Nothing here
//! retries.

use crate::config::AlertConfig;
use crate::models::EscalationAlert;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Errors from a single alert delivery attempt
#[derive(Debug, Error)]
pub enum AlertError {
    #[error("alert webhook URL is not configured")]
    MissingWebhookUrl,

    #[error("alert delivery failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("alert webhook returned status {0}")]
    Status(StatusCode),
}

/// Fire-and-forget delivery of an escalation notice
#[async_trait]
pub trait AlertDispatcher: Send + Sync {
    async fn notify(&self, alert: &EscalationAlert) -> Result<(), AlertError>;
}

/// Dispatcher that records the alert in the structured log and nothing else
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlertDispatcher;

#[async_trait]
impl AlertDispatcher for LogAlertDispatcher {
    async fn notify(&self, alert: &EscalationAlert) -> Result<(), AlertError> {
        warn!(
            target: "escalation_alert",
            alert_id = %alert.alert_id,
            username = %alert.username,
            state = %alert.state,
            source_ip = %alert.source_ip,
            failure_count = alert.failure_count,
            effective_threshold = alert.effective_threshold,
            triggered_at = %alert.triggered_at,
            "Brute-force escalation detected"
        );
        Ok(())
    }
}

/// Dispatcher that POSTs the alert as JSON to a configured webhook
pub struct WebhookAlertDispatcher {
    client: Client,
    url: String,
}

impl WebhookAlertDispatcher {
    /// Build a dispatcher from alert configuration
    ///
    /// The delivery timeout is enforced at the client level, so a slow
    /// endpoint cannot hold a request open past `timeout_seconds`.
    pub fn new(config: &AlertConfig) -> Result<Self, AlertError> {
        let url = config
            .webhook_url
            .clone()
            .ok_or(AlertError::MissingWebhookUrl)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl AlertDispatcher for WebhookAlertDispatcher {
    async fn notify(&self, alert: &EscalationAlert) -> Result<(), AlertError> {
        let response = self.client.post(&self.url).json(alert).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AlertError::Status(status));
        }
        Ok(())
    }
}
