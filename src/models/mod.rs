//! Data structures shared across the detection services.

pub mod alert;
pub mod snapshot;
pub mod state;

pub use alert::*;
pub use snapshot::*;
pub use state::*;

use serde::{Deserialize, Serialize};

/// Result of evaluating one login attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptEvaluation {
    pub state: state::AutomatonState,
    pub captcha_required: bool,
}
