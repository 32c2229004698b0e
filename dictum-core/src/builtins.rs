//! Protocol-level capabilities that ship with the engine. Application
//! capabilities (arithmetic, game moves, ...) are registered by the embedder.

use crate::capability::{Capability, CapabilityCx};
use crate::error::CapabilityError;
use crate::value::Value;

/// Name the reply normalizer keys its quoted-prefix rule on.
pub const REASONING_NAME: &str = "Reasoning";

/// Name the run controller special-cases in bootstrap scripts.
pub const STOP_NAME: &str = "Stop";

/// Free-text thinking slot: lets the model narrate between actions without
/// leaving the command grammar.
pub struct Reasoning;

impl Capability for Reasoning {
    fn name(&self) -> &str {
        REASONING_NAME
    }

    fn description(&self) -> &str {
        "Use this function for your internal reasoning. It should be immediately followed by a function call."
    }

    fn example_args(&self) -> Vec<Value> {
        vec![Value::Str("Next, take the sum of the two integers".into())]
    }

    fn invoke(
        &self,
        _cx: &mut CapabilityCx<'_>,
        _positional: &[Value],
        _keyword: &[(String, Value)],
    ) -> Result<String, CapabilityError> {
        Ok("Proceed to the next step towards the goal.".to_string())
    }
}

/// Raises the session stop signal once the goal has been reached.
pub struct Stop;

impl Capability for Stop {
    fn name(&self) -> &str {
        STOP_NAME
    }

    fn description(&self) -> &str {
        "Use this function to stop the program when the goal has been reached."
    }

    fn example_args(&self) -> Vec<Value> {
        vec![]
    }

    fn invoke(
        &self,
        cx: &mut CapabilityCx<'_>,
        _positional: &[Value],
        _keyword: &[(String, Value)],
    ) -> Result<String, CapabilityError> {
        cx.stop.raise();
        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{SessionState, StopSignal};

    #[test]
    fn reasoning_acknowledges_and_leaves_state_alone() {
        let mut state = SessionState::new();
        let stop = StopSignal::new();
        let mut cx = CapabilityCx { state: &mut state, stop: &stop };
        let output = Reasoning
            .invoke(&mut cx, &[Value::Str("thinking".into())], &[])
            .expect("invoke");
        assert_eq!(output, "Proceed to the next step towards the goal.");
        assert!(!stop.is_raised());
    }

    #[test]
    fn stop_raises_the_signal_and_returns_empty_output() {
        let mut state = SessionState::new();
        let stop = StopSignal::new();
        let mut cx = CapabilityCx { state: &mut state, stop: &stop };
        let output = Stop.invoke(&mut cx, &[], &[]).expect("invoke");
        assert_eq!(output, "");
        assert!(stop.is_raised());
    }

    #[test]
    fn stop_has_arity_zero() {
        assert_eq!(Stop.arity(), 0);
        assert_eq!(Reasoning.arity(), 1);
    }
}
