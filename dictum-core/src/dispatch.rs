//! Safe invocation: the single point where model-triggered code runs.

use serde::{Deserialize, Serialize};

use crate::capability::{Capability, CapabilityCx};
use crate::command::ParsedCommand;
use crate::error::CommandError;

/// Result of executing one command. The payload is always textual so it can
/// be re-inserted into a transcript, empty string included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionOutcome {
    Success(String),
    Error(String),
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Error(text) => text,
        }
    }
}

/// Invoke a resolved capability with validated arguments. An invocation
/// failure becomes an `Error` outcome carrying the failure's message; it is
/// never allowed to escape to the controller as a fault.
pub fn dispatch(
    capability: &dyn Capability,
    cx: &mut CapabilityCx<'_>,
    command: &ParsedCommand,
) -> ExecutionOutcome {
    match capability.invoke(cx, &command.positional, &command.keyword) {
        Ok(output) => ExecutionOutcome::Success(output),
        Err(failure) => {
            tracing::debug!(
                capability = %command.name,
                error = %failure,
                "capability invocation failed"
            );
            ExecutionOutcome::Error(CommandError::Execution(failure.to_string()).to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{SessionState, StopSignal};
    use crate::error::CapabilityError;
    use crate::value::Value;

    struct Flaky;

    impl Capability for Flaky {
        fn name(&self) -> &str {
            "Flaky"
        }
        fn description(&self) -> &str {
            "Fails when told to."
        }
        fn example_args(&self) -> Vec<Value> {
            vec![Value::Bool(false)]
        }
        fn invoke(
            &self,
            _cx: &mut CapabilityCx<'_>,
            positional: &[Value],
            _keyword: &[(String, Value)],
        ) -> Result<String, CapabilityError> {
            if positional[0].as_bool() == Some(true) {
                return Err(CapabilityError::new("deliberate failure"));
            }
            Ok("ok".to_string())
        }
    }

    fn run(fail: bool) -> ExecutionOutcome {
        let mut state = SessionState::new();
        let stop = StopSignal::new();
        let mut cx = CapabilityCx { state: &mut state, stop: &stop };
        let command = ParsedCommand {
            name: "Flaky".into(),
            positional: vec![Value::Bool(fail)],
            keyword: vec![],
        };
        dispatch(&Flaky, &mut cx, &command)
    }

    #[test]
    fn success_carries_the_capability_output() {
        assert_eq!(run(false), ExecutionOutcome::Success("ok".into()));
    }

    #[test]
    fn invocation_failure_becomes_an_error_outcome() {
        let outcome = run(true);
        assert!(!outcome.is_success());
        assert_eq!(
            outcome.text(),
            "Error: deliberate failure. Please try again."
        );
    }
}
