//! Session budgets and run accounting.

use serde::{Deserialize, Serialize};

/// Limits applied to one session run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionBudget {
    /// Attempts per step, malformed replies and failed commands included.
    pub max_tries: u32,
    /// Successful steps before the run is cut off.
    pub max_steps: u32,
    /// Cumulative provider token ceiling for the whole session.
    pub max_session_tokens: u64,
}

impl Default for SessionBudget {
    fn default() -> Self {
        Self {
            max_tries: 3,
            max_steps: 10,
            max_session_tokens: 30_000,
        }
    }
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// A step gave up: tries, tokens, or an unavailable provider.
    Aborted,
    /// The step ceiling was reached without a stop request.
    Exhausted,
    /// The stop capability was invoked.
    Completed,
}

impl std::fmt::Display for FinishReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Aborted => "aborted",
            Self::Exhausted => "exhausted",
            Self::Completed => "completed",
        };
        f.write_str(label)
    }
}

/// Mutable accounting for a run in progress.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunState {
    pub total_tokens: u64,
    pub step_count: u32,
    pub finish_reason: Option<FinishReason>,
    pub last_output: String,
}
