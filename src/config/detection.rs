//! Detection engine configuration.

use std::env;

/// Configuration for the brute-force detection engine
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    /// Failure count that triggers `ALERT` before reputation adjustment
    pub base_threshold: u32,
    /// Sliding window over which failures are counted, in seconds
    pub window_seconds: u64,
    /// Default duration of an IP block, in seconds
    pub block_duration_seconds: u64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            base_threshold: 3,
            window_seconds: 60,
            block_duration_seconds: 120,
        }
    }
}

impl DetectionConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let base_threshold = env::var("DETECTION_BASE_THRESHOLD")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);

        let window_seconds = env::var("DETECTION_WINDOW_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        let block_duration_seconds = env::var("DETECTION_BLOCK_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(120);

        Self {
            base_threshold,
            window_seconds,
            block_duration_seconds,
        }
    }
}
