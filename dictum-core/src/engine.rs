//! `Engine`: parse → validate → dispatch behind a single `execute` call.

use crate::capability::{Capability, CapabilityCx, SessionState, StopSignal};
use crate::dispatch::{dispatch, ExecutionOutcome};
use crate::error::EngineError;
use crate::parser::parse_command;
use crate::registry::CapabilityRegistry;
use crate::validator::resolve;

/// Composes the registry, parser, validator and dispatcher. One engine
/// serves one session at a time; the stop binding is the channel back to it.
#[derive(Default)]
pub struct Engine {
    registry: CapabilityRegistry,
    state: SessionState,
    stop: Option<StopSignal>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine over pre-seeded shared state.
    pub fn with_state(state: SessionState) -> Self {
        Self {
            registry: CapabilityRegistry::new(),
            state,
            stop: None,
        }
    }

    pub fn register(&mut self, capability: Box<dyn Capability>) {
        self.registry.register(capability);
    }

    /// Bind the engine to a session's stop signal. Required before `execute`.
    pub fn bind(&mut self, stop: StopSignal) {
        self.stop = Some(stop);
    }

    pub fn is_bound(&self) -> bool {
        self.stop.is_some()
    }

    /// Combined capability help. Reading it arms the `execute` gate.
    pub fn help(&mut self) -> String {
        self.registry.help()
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    /// Execute one textual command. Command-level failures come back as
    /// `Ok(ExecutionOutcome::Error(text))` with a transcript-ready
    /// explanation; only precondition violations are `Err`.
    pub fn execute(&mut self, command: &str) -> Result<ExecutionOutcome, EngineError> {
        let stop = self.stop.as_ref().ok_or(EngineError::Unbound)?;
        if !self.registry.help_accessed() {
            return Err(EngineError::HelpNotSurfaced);
        }

        let parsed = match parse_command(command) {
            Ok(parsed) => parsed,
            Err(error) => return Ok(ExecutionOutcome::Error(error.to_string())),
        };
        let capability = match resolve(&self.registry, &parsed, command) {
            Ok(capability) => capability,
            Err(error) => return Ok(ExecutionOutcome::Error(error.to_string())),
        };

        let mut cx = CapabilityCx {
            state: &mut self.state,
            stop,
        };
        Ok(dispatch(capability, &mut cx, &parsed))
    }
}
