//! The structured form of one validated-shape call.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// One call on a bare name with literal arguments only. Transient: produced
/// and consumed within a single `execute`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedCommand {
    pub name: String,
    pub positional: Vec<Value>,
    /// Keyword arguments in the order they were written.
    pub keyword: Vec<(String, Value)>,
}

impl ParsedCommand {
    /// Total argument count, checked against the target capability's arity.
    pub fn arg_count(&self) -> usize {
        self.positional.len() + self.keyword.len()
    }
}
