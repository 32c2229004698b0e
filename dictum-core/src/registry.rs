//! Capability registry keyed by name, with the sticky help guardrail.

use crate::capability::Capability;

/// Holds registered capabilities. Last registration under a given name wins,
/// keeping the original position in the help listing.
#[derive(Default)]
pub struct CapabilityRegistry {
    capabilities: Vec<Box<dyn Capability>>,
    help_accessed: bool,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registration cannot fail; a duplicate name silently replaces the
    /// previous capability.
    pub fn register(&mut self, capability: Box<dyn Capability>) {
        let name = capability.name().to_string();
        if let Some(slot) = self
            .capabilities
            .iter_mut()
            .find(|existing| existing.name() == name)
        {
            tracing::debug!(capability = %name, "replacing registered capability");
            *slot = capability;
        } else {
            tracing::debug!(capability = %name, "registered capability");
            self.capabilities.push(capability);
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Capability> {
        self.capabilities
            .iter()
            .find(|capability| capability.name() == name)
            .map(|capability| capability.as_ref())
    }

    /// Combined help text, one entry per capability. The first read flips the
    /// sticky `help_accessed` flag that gates `Engine::execute` — whoever
    /// builds the model-facing prompt must have surfaced the capability list.
    pub fn help(&mut self) -> String {
        self.help_accessed = true;
        self.capabilities
            .iter()
            .map(|capability| capability.help_entry())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn help_accessed(&self) -> bool {
        self.help_accessed
    }

    pub fn names(&self) -> Vec<&str> {
        self.capabilities
            .iter()
            .map(|capability| capability.name())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}
