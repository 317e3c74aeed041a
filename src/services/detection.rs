//! Brute-force detection engine.

use crate::config::DetectionConfig;
use crate::models::{
    AttemptEvaluation, AutomatonState, EscalationAlert, PrincipalState, ReputationProfile,
    StoreSnapshot,
};
use crate::services::{
    alerts::AlertDispatcher, block_registry::BlockRegistry, metrics::DetectionMetrics,
    principal_store::PrincipalStateStore, reputation::ReputationRegistry,
    snapshot::SnapshotStore, threshold::effective_threshold,
};
use crate::utils::clock::{Clock, SystemClock};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Errors surfaced to attempt-processing callers
///
/// Persistence and alert-delivery failures are deliberately absent: those
/// degrade to logs and never fail the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DetectionError {
    #[error("username must not be empty")]
    EmptyUsername,
}

/// Adaptive brute-force detection over per-principal sliding windows
///
/// One engine instance owns the principal state store, the IP block
/// registry, and the IP reputation registry, and composes them per call.
/// Cloning is cheap and clones share state, so the engine can be handed to
/// any number of concurrent request handlers.
#[derive(Clone)]
pub struct DetectionEngine {
    config: DetectionConfig,
    principals: PrincipalStateStore,
    blocks: BlockRegistry,
    reputation: ReputationRegistry,
    snapshot: Option<SnapshotStore>,
    dispatcher: Option<Arc<dyn AlertDispatcher>>,
    alert_timeout: Duration,
    metrics: Option<DetectionMetrics>,
    clock: Arc<dyn Clock>,
}

impl DetectionEngine {
    /// Create an engine with in-memory state and the system clock
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            config,
            principals: PrincipalStateStore::new(),
            blocks: BlockRegistry::new(),
            reputation: ReputationRegistry::new(),
            snapshot: None,
            dispatcher: None,
            alert_timeout: Duration::from_secs(5),
            metrics: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source (tests drive a [`ManualClock`] through this)
    ///
    /// [`ManualClock`]: crate::utils::clock::ManualClock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Enable write-through snapshot persistence, seeding state from any
    /// existing snapshot on disk
    pub fn with_snapshot(mut self, store: SnapshotStore) -> Self {
        if let Some(snapshot) = store.load() {
            self.principals.restore(snapshot.principals);
            self.blocks.restore(snapshot.ip_blocks);
            self.reputation.restore(snapshot.ip_profiles);
            info!(path = %store.path().display(), "detection state restored from snapshot");
        }
        self.snapshot = Some(store);
        self
    }

    /// Attach an alert dispatcher, bounding each delivery by `timeout`
    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn AlertDispatcher>, timeout: Duration) -> Self {
        self.dispatcher = Some(dispatcher);
        self.alert_timeout = timeout;
        self
    }

    /// Attach Prometheus counters
    pub fn with_metrics(mut self, metrics: DetectionMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Evaluate one login attempt for `username` from `ip`
    ///
    /// The load-evaluate-store sequence is atomic per username. A success
    /// fully resets the principal; a failure is appended to the sliding
    /// window and the automaton state derived from the surviving count
    /// against the reputation-adjusted threshold. The threshold is
    /// recomputed from the IP's current reputation on every call, so a
    /// reputation downgrade can escalate a principal mid-window.
    ///
    /// On the transition into `ALERT` the attached dispatcher is notified
    /// on a detached task, after the state write has committed and the
    /// per-principal lock is released.
    pub async fn process_attempt(
        &self,
        username: &str,
        success: bool,
        ip: &str,
    ) -> Result<AttemptEvaluation, DetectionError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(DetectionError::EmptyUsername);
        }

        let profile = self.reputation.profile(ip);
        let threshold = effective_threshold(self.config.base_threshold, profile);
        let window = self.config.window_seconds;
        let now = self.clock.now();

        let (evaluation, escalated, failure_count) = self.principals.update(
            username,
            || PrincipalState::new(threshold, window),
            |state| {
                state.threshold = threshold;
                state.window = window;
                let was_alert = state.state == AutomatonState::Alert;
                if success {
                    state.reset();
                } else {
                    state.record_failure(now);
                }
                let escalated = !was_alert && state.state == AutomatonState::Alert;
                (
                    AttemptEvaluation {
                        state: state.state,
                        captcha_required: state.captcha_required,
                    },
                    escalated,
                    state.failure_count(),
                )
            },
        );

        self.persist();

        if let Some(metrics) = &self.metrics {
            metrics.record_attempt(success);
            if escalated {
                metrics.record_escalation();
            }
        }

        if escalated {
            info!(
                username,
                ip,
                failure_count,
                effective_threshold = threshold,
                "principal escalated to ALERT"
            );
            self.dispatch_alert(username, ip, failure_count, threshold);
        }

        Ok(evaluation)
    }

    /// Fully reset a principal: timestamps emptied, state back to `START`,
    /// captcha flag cleared
    pub fn reset_principal(&self, username: &str) {
        if self.principals.remove(username) {
            info!(username, "principal state reset");
            self.persist();
        }
    }

    /// Whether `ip` is currently blocked (lazily expiring stale entries)
    pub fn is_blocked(&self, ip: &str) -> bool {
        self.blocks.is_blocked(ip, self.clock.now())
    }

    /// Seconds until `ip` unblocks; 0 when not blocked
    pub fn remaining_seconds(&self, ip: &str) -> u64 {
        self.blocks.remaining_seconds(ip, self.clock.now())
    }

    /// Block `ip` for `duration_seconds` from now
    pub fn block(&self, ip: &str, duration_seconds: u64) {
        let unblock_at = self.clock.now() + duration_seconds;
        self.blocks.block(ip, unblock_at);
        if let Some(metrics) = &self.metrics {
            metrics.record_block();
        }
        info!(ip, duration_seconds, "IP blocked");
        self.persist();
    }

    /// Remove any block on `ip`
    pub fn unblock(&self, ip: &str) {
        if self.blocks.unblock(ip) {
            info!(ip, "IP unblocked");
            self.persist();
        }
    }

    /// Classify an IP's reputation
    pub fn set_reputation(&self, ip: &str, profile: ReputationProfile) {
        self.reputation.set_profile(ip, profile);
        self.persist();
    }

    /// Current reputation classification for `ip`
    pub fn get_reputation(&self, ip: &str) -> ReputationProfile {
        self.reputation.profile(ip)
    }

    /// Snapshot of every principal with recorded state
    pub fn list_principals(&self) -> Vec<(String, PrincipalState)> {
        self.principals.entries()
    }

    /// Drop all principal, block, and reputation state
    pub fn clear_all(&self) {
        self.principals.clear();
        self.blocks.clear();
        self.reputation.clear();
        self.persist();
    }

    /// Hand the current alert off to the dispatcher on a detached task
    ///
    /// Runs after the state write has committed; a slow or failing
    /// delivery never serializes other attempts or surfaces to the caller.
    fn dispatch_alert(&self, username: &str, ip: &str, failure_count: usize, threshold: u32) {
        let Some(dispatcher) = self.dispatcher.clone() else {
            return;
        };
        let alert =
            EscalationAlert::new(username, AutomatonState::Alert, ip, failure_count, threshold);
        let timeout = self.alert_timeout;
        tokio::spawn(async move {
            match tokio::time::timeout(timeout, dispatcher.notify(&alert)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!(alert_id = %alert.alert_id, error = %e, "alert delivery failed");
                }
                Err(_) => {
                    warn!(alert_id = %alert.alert_id, "alert delivery timed out");
                }
            }
        });
    }

    /// Best-effort write-through of the full state snapshot
    fn persist(&self) {
        let Some(store) = &self.snapshot else {
            return;
        };
        let snapshot = StoreSnapshot {
            principals: self.principals.entries().into_iter().collect(),
            ip_blocks: self.blocks.entries(),
            ip_profiles: self.reputation.entries(),
        };
        store.save(&snapshot);
    }
}
