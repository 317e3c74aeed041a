//! Core detection services.
//!
//! The detection engine orchestrates the three keyed stores (principal
//! state, IP blocks, IP reputation), the threshold policy, and the alert
//! dispatchers.

pub mod alerts;
pub mod block_registry;
pub mod detection;
pub mod metrics;
pub mod principal_store;
pub mod reputation;
pub mod snapshot;
pub mod threshold;

pub use alerts::*;
pub use block_registry::*;
pub use detection::*;
pub use metrics::*;
pub use principal_store::*;
pub use reputation::*;
pub use snapshot::*;
pub use threshold::*;
