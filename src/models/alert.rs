//! Escalation alert payload.

use crate::models::state::AutomatonState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Notification emitted when a principal transitions into `ALERT`
///
/// This is the wire payload handed to an [`AlertDispatcher`]; delivery is
/// advisory and best-effort, so the payload carries everything a receiver
/// needs without a follow-up query.
///
/// [`AlertDispatcher`]: crate::services::alerts::AlertDispatcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationAlert {
    pub alert_id: Uuid,
    pub username: String,
    pub state: AutomatonState,
    pub source_ip: String,
    pub failure_count: usize,
    pub effective_threshold: u32,
    pub triggered_at: DateTime<Utc>,
}

impl EscalationAlert {
    /// Build an alert for a principal that just escalated
    pub fn new(
        username: &str,
        state: AutomatonState,
        source_ip: &str,
        failure_count: usize,
        effective_threshold: u32,
    ) -> Self {
        Self {
            alert_id: Uuid::new_v4(),
            username: username.to_string(),
            state,
            source_ip: source_ip.to_string(),
            failure_count,
            effective_threshold,
            triggered_at: Utc::now(),
        }
    }
}
