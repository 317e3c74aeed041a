//! Bruteguard - adaptive credential brute-force detection
//!
//! A per-principal finite-state counter driven by a sliding time window,
//! a reputation-adjusted threshold policy, and concurrency-safe keyed
//! stores for principal state, IP blocks, and IP reputation:
//! - Sliding-window failure counting with automatic pruning
//! - `START` / `FAILn` / `ALERT` automaton derived from the window contents
//! - Per-IP trust classification that raises or lowers the threshold
//! - Lazily expiring IP blocks with remaining-time queries
//! - Best-effort JSON snapshot persistence
//! - Advisory alert dispatch (structured log or webhook) off the hot path
//! - Prometheus counters for attempts, escalations, and blocks
//!
//! ## Architecture
//!
//! The codebase is organized into focused modules:
//! - `models/` - Automaton state, principal state, alert and snapshot types
//! - `services/` - Detection engine, keyed stores, dispatchers, metrics
//! - `config/` - Configuration structures and environment loading
//! - `utils/` - Clock abstraction for real and simulated time
//!
//! ## Quick Start
//!
//! ```no_run
//! use bruteguard::{DetectionConfig, DetectionEngine};
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = DetectionEngine::new(DetectionConfig::default());
//!     let eval = engine.process_attempt("alice", false, "203.0.113.7").await.unwrap();
//!     if eval.captcha_required {
//!         let duration = engine.config().block_duration_seconds;
//!         engine.block("203.0.113.7", duration);
//!     }
//! }
//! ```

// Core modules
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types and functions for convenience
pub use config::{AlertConfig, DetectionConfig, SnapshotConfig};
pub use models::{
    AttemptEvaluation, AutomatonState, EscalationAlert, PrincipalState, ReputationProfile,
    StoreSnapshot,
};
pub use services::{
    effective_threshold, AlertDispatcher, AlertError, BlockRegistry, DetectionEngine,
    DetectionError, DetectionMetrics, LogAlertDispatcher, PrincipalStateStore,
    ReputationRegistry, SnapshotStore, WebhookAlertDispatcher,
};
pub use utils::{Clock, ManualClock, SystemClock};
