//! Persisted snapshot layout for the detection state.

use crate::models::state::{PrincipalState, ReputationProfile};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// On-disk image of the three keyed stores
///
/// Written best-effort after each mutation; the three maps are not
/// transactional with respect to each other, and a stale snapshot is
/// acceptable (the state is an advisory security signal, not an audit
/// trail).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// username -> automaton state
    pub principals: HashMap<String, PrincipalState>,
    /// ip -> unblock time, epoch seconds
    pub ip_blocks: HashMap<String, u64>,
    /// ip -> reputation classification
    pub ip_profiles: HashMap<String, ReputationProfile>,
}
