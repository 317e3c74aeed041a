//! Concurrency-safe keyed store for per-principal detection state.

use crate::models::PrincipalState;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, RwLock},
};

/// In-memory map from username to [`PrincipalState`]
///
/// Lock granularity is one mutex per username: the outer map lock is held
/// only long enough to look up or insert the entry, and the per-principal
/// mutex serializes the read-modify-write unit. Attempts for different
/// usernames never wait on each other.
#[derive(Clone, Default)]
pub struct PrincipalStateStore {
    entries: Arc<RwLock<HashMap<String, Arc<Mutex<PrincipalState>>>>>,
}

impl PrincipalStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically load-or-create the principal's state and apply `mutate`
    ///
    /// An absent principal is materialized from `default` first; the whole
    /// load-mutate sequence is one atomic unit with respect to other calls
    /// for the same username.
    pub fn update<R>(
        &self,
        username: &str,
        default: impl FnOnce() -> PrincipalState,
        mutate: impl FnOnce(&mut PrincipalState) -> R,
    ) -> R {
        let entry = {
            let mut map = self.entries.write().unwrap();
            Arc::clone(
                map.entry(username.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(default()))),
            )
        };
        let mut state = entry.lock().unwrap();
        mutate(&mut state)
    }

    /// Read a copy of the principal's state, if one exists
    pub fn load(&self, username: &str) -> Option<PrincipalState> {
        let entry = {
            let map = self.entries.read().unwrap();
            map.get(username).cloned()
        };
        entry.map(|e| e.lock().unwrap().clone())
    }

    /// Remove the principal's state entirely; returns whether it existed
    pub fn remove(&self, username: &str) -> bool {
        self.entries.write().unwrap().remove(username).is_some()
    }

    /// Snapshot of all principals and their states
    ///
    /// Iteration order is unspecified and the snapshot is not required to
    /// be consistent with mutations that race it.
    pub fn entries(&self) -> Vec<(String, PrincipalState)> {
        let handles: Vec<(String, Arc<Mutex<PrincipalState>>)> = {
            let map = self.entries.read().unwrap();
            map.iter()
                .map(|(k, v)| (k.clone(), Arc::clone(v)))
                .collect()
        };
        handles
            .into_iter()
            .map(|(k, v)| {
                let state = v.lock().unwrap().clone();
                (k, state)
            })
            .collect()
    }

    /// Replace all contents from a persisted snapshot
    pub fn restore(&self, principals: HashMap<String, PrincipalState>) {
        let mut map = self.entries.write().unwrap();
        map.clear();
        for (username, state) in principals {
            map.insert(username, Arc::new(Mutex::new(state)));
        }
    }

    /// Drop every principal's state
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
