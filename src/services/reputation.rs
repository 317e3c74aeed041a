//! IP reputation registry.

use crate::models::ReputationProfile;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

/// Map from IP address to trust classification
///
/// Written by operators or an upstream intel feed; the detection engine
/// only reads it. Unknown and empty IPs classify as `Normal`.
#[derive(Clone, Default)]
pub struct ReputationRegistry {
    entries: Arc<RwLock<HashMap<String, ReputationProfile>>>,
}

impl ReputationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `ip`; replaces any previous classification
    pub fn set_profile(&self, ip: &str, profile: ReputationProfile) {
        self.entries
            .write()
            .unwrap()
            .insert(ip.to_string(), profile);
    }

    /// Current classification of `ip`, defaulting to `Normal`
    pub fn profile(&self, ip: &str) -> ReputationProfile {
        if ip.is_empty() {
            return ReputationProfile::Normal;
        }
        self.entries
            .read()
            .unwrap()
            .get(ip)
            .copied()
            .unwrap_or_default()
    }

    /// Copy of all classifications
    pub fn entries(&self) -> HashMap<String, ReputationProfile> {
        self.entries.read().unwrap().clone()
    }

    /// Replace all contents from a persisted snapshot
    pub fn restore(&self, profiles: HashMap<String, ReputationProfile>) {
        *self.entries.write().unwrap() = profiles;
    }

    /// Drop every classification
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }
}
