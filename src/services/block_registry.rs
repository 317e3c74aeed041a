//! Time-bounded IP block registry with lazy expiry.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

/// Map from IP address to unblock time (epoch seconds)
///
/// Entries are never swept proactively; an expired entry is removed the
/// first time a read observes it, and an entry whose time has passed is
/// indistinguishable from an absent one.
#[derive(Clone, Default)]
pub struct BlockRegistry {
    entries: Arc<RwLock<HashMap<String, u64>>>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block `ip` until the absolute epoch second `unblock_at`
    pub fn block(&self, ip: &str, unblock_at: u64) {
        self.entries
            .write()
            .unwrap()
            .insert(ip.to_string(), unblock_at);
    }

    /// Remove any block on `ip`; returns whether one existed
    pub fn unblock(&self, ip: &str) -> bool {
        self.entries.write().unwrap().remove(ip).is_some()
    }

    /// Whether `ip` is currently blocked, expiring the entry if stale
    pub fn is_blocked(&self, ip: &str, now: u64) -> bool {
        let mut map = self.entries.write().unwrap();
        match map.get(ip) {
            Some(&unblock_at) if now < unblock_at => true,
            Some(_) => {
                map.remove(ip);
                false
            }
            None => false,
        }
    }

    /// Seconds until `ip` unblocks; 0 when not blocked
    pub fn remaining_seconds(&self, ip: &str, now: u64) -> u64 {
        let mut map = self.entries.write().unwrap();
        match map.get(ip) {
            Some(&unblock_at) if now < unblock_at => unblock_at - now,
            Some(_) => {
                map.remove(ip);
                0
            }
            None => 0,
        }
    }

    /// Copy of all block entries, including any not yet lazily expired
    pub fn entries(&self) -> HashMap<String, u64> {
        self.entries.read().unwrap().clone()
    }

    /// Replace all contents from a persisted snapshot
    pub fn restore(&self, blocks: HashMap<String, u64>) {
        *self.entries.write().unwrap() = blocks;
    }

    /// Drop every block entry
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }
}
