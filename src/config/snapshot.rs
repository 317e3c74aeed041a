//! State snapshot persistence configuration.

use std::env;
use std::path::PathBuf;

/// Configuration for best-effort state snapshots
#[derive(Debug, Clone, Default)]
pub struct SnapshotConfig {
    /// Snapshot file path; `None` keeps all state in memory only
    pub path: Option<PathBuf>,
}

impl SnapshotConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let path = env::var("STATE_SNAPSHOT_PATH")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self { path }
    }
}
