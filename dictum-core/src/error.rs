//! Error taxonomy. Command-level errors are recovered inside a step and fed
//! back to the model as corrective context; engine errors are fatal
//! preconditions that indicate a setup mistake, not a model-behavior problem.

/// A rejected command. Every variant formats to a human-readable string
/// suitable for re-insertion into the transcript.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Error: syntax error in command {0}. Please try again.")]
    Syntax(String),

    #[error("Error: unsupported command {command}. {hint} Please try again.")]
    UnsupportedConstruct { command: String, hint: String },

    #[error("Error: unknown command {0}. Please try again.")]
    UnknownFunction(String),

    /// Carries the target capability's own usage hint so the transcript
    /// teaches the correct shape.
    #[error("{usage_hint}")]
    ArityMismatch { usage_hint: String },

    #[error("Error: {0}. Please try again.")]
    Execution(String),
}

/// Fatal `execute` preconditions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("engine is not bound to a session; bind a stop signal before executing commands")]
    Unbound,

    #[error(
        "help text was never surfaced; build the prompt from the registry help before executing commands"
    )]
    HelpNotSurfaced,
}

/// Failure raised by a capability during invocation. The dispatcher converts
/// it into an `Error` outcome; it never crosses that boundary as a fault.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct CapabilityError(pub String);

impl CapabilityError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
