//! Transcript message types.

use serde::{Deserialize, Serialize};

/// Role of a message in the conversation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Append-only conversation history, owned by the session.
pub type Transcript = Vec<Message>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_snake_case() {
        let message = Message::assistant("Add(1, 2)");
        let encoded = serde_json::to_string(&message).expect("serialize");
        assert_eq!(encoded, r#"{"role":"assistant","content":"Add(1, 2)"}"#);
    }
}
