//! Best-effort JSON snapshot persistence.

use crate::models::StoreSnapshot;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Write-through snapshot of the detection state to a JSON file
///
/// Persistence is advisory: a failed read or write is logged and otherwise
/// ignored, and detection continues on in-memory state alone. A stale file
/// on disk is acceptable.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Read the snapshot from disk, if a readable one exists
    pub fn load(&self) -> Option<StoreSnapshot> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read state snapshot");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to parse state snapshot");
                None
            }
        }
    }

    /// Persist the snapshot, swallowing and logging any failure
    pub fn save(&self, snapshot: &StoreSnapshot) {
        let json = match serde_json::to_string(snapshot) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize state snapshot");
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, json) {
            warn!(path = %self.path.display(), error = %e, "failed to write state snapshot");
        } else {
            debug!(path = %self.path.display(), "state snapshot written");
        }
    }
}
