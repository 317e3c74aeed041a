//! Principal automaton state and reputation data structures.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use std::str::FromStr;

/// Detection automaton state for a single principal
///
/// The state is derived from the number of failures inside the sliding
/// window compared against the effective threshold; it carries no history
/// of its own beyond the window contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutomatonState {
    /// No failures recorded inside the window
    Start,
    /// `n` failures inside the window, below the effective threshold
    Fail(u32),
    /// Failure count reached the effective threshold
    Alert,
}

impl fmt::Display for AutomatonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutomatonState::Start => write!(f, "START"),
            AutomatonState::Fail(n) => write!(f, "FAIL{n}"),
            AutomatonState::Alert => write!(f, "ALERT"),
        }
    }
}

impl FromStr for AutomatonState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "START" => Ok(AutomatonState::Start),
            "ALERT" => Ok(AutomatonState::Alert),
            other => match other.strip_prefix("FAIL") {
                Some(n) => n
                    .parse()
                    .map(AutomatonState::Fail)
                    .map_err(|_| format!("invalid automaton state: {other}")),
                None => Err(format!("invalid automaton state: {other}")),
            },
        }
    }
}

// Persisted snapshots store the state as its string form ("START",
// "FAIL2", "ALERT"), so serde goes through Display/FromStr.
impl Serialize for AutomatonState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AutomatonState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Trust classification for a source IP address
///
/// Set externally (operator or upstream intel feed); the detection engine
/// only reads it to adjust the effective threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReputationProfile {
    Trusted,
    #[default]
    Normal,
    Suspicious,
}

/// Per-principal detection state, keyed by username
///
/// `failure_timestamps` holds epoch seconds of failed attempts inside the
/// sliding window; entries older than `window` are pruned on every touch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipalState {
    pub threshold: u32,
    pub window: u64,
    pub failure_timestamps: Vec<u64>,
    pub state: AutomatonState,
    pub captcha_required: bool,
}

impl PrincipalState {
    /// Create a fresh state with no recorded failures
    pub fn new(threshold: u32, window: u64) -> Self {
        Self {
            threshold,
            window,
            failure_timestamps: Vec::new(),
            state: AutomatonState::Start,
            captcha_required: false,
        }
    }

    /// Clear all recorded failures and flags, returning to `START`
    pub fn reset(&mut self) {
        self.failure_timestamps.clear();
        self.state = AutomatonState::Start;
        self.captcha_required = false;
    }

    /// Drop failure timestamps that have aged out of the window
    pub fn prune(&mut self, now: u64) {
        let window = self.window;
        self.failure_timestamps
            .retain(|&t| now.saturating_sub(t) <= window);
    }

    /// Record a failed attempt at `now` and advance the automaton
    ///
    /// Appends the timestamp, prunes the window, then derives the new state
    /// from the surviving count versus the current threshold. The captcha
    /// flag is set on entering `ALERT` and stays set until an explicit
    /// reset, even if later pruning drops the count back below threshold.
    pub fn record_failure(&mut self, now: u64) -> AutomatonState {
        self.failure_timestamps.push(now);
        self.prune(now);
        let count = self.failure_timestamps.len() as u32;
        if count >= self.threshold {
            self.state = AutomatonState::Alert;
            self.captcha_required = true;
        } else {
            self.state = AutomatonState::Fail(count);
        }
        self.state
    }

    /// Number of failures currently inside the window
    pub fn failure_count(&self) -> usize {
        self.failure_timestamps.len()
    }
}
