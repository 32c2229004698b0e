//! The capability seam: named, fixed-arity units of behavior invoked by
//! textual commands.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::CapabilityError;
use crate::value::Value;

/// Shared mutable state threaded to every capability. Constructed once per
/// session and owned by it, never by an individual capability.
pub type SessionState = HashMap<String, serde_json::Value>;

/// Cloneable stop handle shared between the engine and its session. The only
/// legal writer during a run is the stop capability, via the engine binding;
/// the session clears it when it starts over.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Reset for a fresh session run.
    pub fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Per-invocation context: the shared session state plus the stop handle a
/// capability may use to request session stop.
pub struct CapabilityCx<'a> {
    pub state: &'a mut SessionState,
    pub stop: &'a StopSignal,
}

/// A named unit of behavior with declared metadata and a fixed arity.
///
/// Registered once at startup; immutable thereafter except for the shared
/// state it mutates through the invocation context.
pub trait Capability: Send + Sync {
    /// Unique registry key. Last registration under a name wins.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Example arguments shown in the usage line.
    fn example_args(&self) -> Vec<Value>;

    /// Number of arguments the capability accepts, positional and keyword
    /// combined. Derived from the example arguments unless overridden.
    fn arity(&self) -> usize {
        self.example_args().len()
    }

    fn invoke(
        &self,
        cx: &mut CapabilityCx<'_>,
        positional: &[Value],
        keyword: &[(String, Value)],
    ) -> Result<String, CapabilityError>;

    /// Model-facing usage line, e.g. `Add(2, 2)`.
    fn usage(&self) -> String {
        let args = self
            .example_args()
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({})", self.name(), args)
    }

    /// One entry in the combined registry help text.
    fn help_entry(&self) -> String {
        format!("{}\n{}", self.usage(), self.description())
    }

    /// Corrective text returned when the argument count is wrong.
    fn arity_hint(&self) -> String {
        format!(
            "Error: invalid arguments for {}. Usage: {}. Please try again.",
            self.name(),
            self.usage()
        )
    }
}

impl std::fmt::Debug for dyn Capability + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capability")
            .field("name", &self.name())
            .finish()
    }
}
