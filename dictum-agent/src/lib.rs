//! Session layer over `dictum-core`: drives a completion provider through the
//! command engine under retry and budget limits, and records finished runs.

pub mod budget;
pub mod provider;
pub mod record;
pub mod run;
pub mod step;

pub use budget::{FinishReason, RunState, SessionBudget};
pub use provider::{Completion, CompletionProvider, ProviderError, ScriptedProvider};
pub use record::{MemorySink, RunRecord, RunSink};
pub use run::{RunController, RunOutcome};
pub use step::{StepController, StepOutcome};

use dictum_core::EngineError;

/// Faults that abort a session before or outside the step loop. Everything
/// recoverable is handled inside the loop as a retry or an abort reason.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no prompt configured for this session")]
    MissingPrompt,

    #[error("bootstrap command {command} failed: {message}")]
    Bootstrap { command: String, message: String },

    #[error(transparent)]
    Engine(#[from] EngineError),
}
