//! Registry-level validation: the command must name a registered capability
//! and supply exactly its declared number of arguments.

use crate::capability::Capability;
use crate::command::ParsedCommand;
use crate::error::CommandError;
use crate::registry::CapabilityRegistry;

/// Resolve a parsed command against the registry. On an arity mismatch the
/// error carries the capability's own usage hint so the transcript teaches
/// the correct shape rather than a generic message.
pub fn resolve<'r>(
    registry: &'r CapabilityRegistry,
    command: &ParsedCommand,
    raw: &str,
) -> Result<&'r dyn Capability, CommandError> {
    let capability = registry
        .get(&command.name)
        .ok_or_else(|| CommandError::UnknownFunction(raw.to_string()))?;
    if command.arg_count() != capability.arity() {
        return Err(CommandError::ArityMismatch {
            usage_hint: capability.arity_hint(),
        });
    }
    Ok(capability)
}
