//! Alert delivery configuration.

use std::env;

/// Configuration for escalation alert delivery
#[derive(Debug, Clone)]
pub struct AlertConfig {
    /// Webhook endpoint to POST alerts to; `None` disables the webhook path
    pub webhook_url: Option<String>,
    /// Upper bound on a single delivery attempt, in seconds
    pub timeout_seconds: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_seconds: 5,
        }
    }
}

impl AlertConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let webhook_url = env::var("ALERT_WEBHOOK_URL").ok().filter(|v| !v.is_empty());

        let timeout_seconds = env::var("ALERT_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        Self {
            webhook_url,
            timeout_seconds,
        }
    }
}
