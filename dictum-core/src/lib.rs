//! Engine for command-driven model sessions: a text-generation model emits
//! one textual command per turn, and the engine parses, strictly validates
//! and dispatches it to a registered capability.

pub mod builtins;
pub mod capability;
pub mod command;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod message;
pub mod normalize;
pub mod parser;
pub mod registry;
pub mod validator;
pub mod value;

pub use capability::{Capability, CapabilityCx, SessionState, StopSignal};
pub use command::ParsedCommand;
pub use dispatch::ExecutionOutcome;
pub use engine::Engine;
pub use error::{CapabilityError, CommandError, EngineError};
pub use message::{Message, Role, Transcript};
pub use normalize::ReplyNormalizer;
pub use registry::CapabilityRegistry;
pub use value::Value;
