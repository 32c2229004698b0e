//! Completion provider seam. The controllers only ever see this trait; tests
//! and offline runs use the scripted implementation.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

use dictum_core::Message;

/// One provider reply plus the tokens it cost, prompt and completion combined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub tokens_used: u64,
}

impl Completion {
    pub fn new(text: impl Into<String>, tokens_used: u64) -> Self {
        Self {
            text: text.into(),
            tokens_used,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider {provider} unavailable: {reason}")]
    Unavailable { provider: String, reason: String },

    #[error("scripted provider ran out of replies")]
    ScriptExhausted,
}

/// Text-completion backend: a transcript in, one reply out. Implementations
/// must not retry internally; retry policy belongs to the step controller.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn model(&self) -> &str;

    async fn complete(&self, transcript: &[Message]) -> Result<Completion, ProviderError>;
}

/// Replays a fixed list of completions in order. Popping past the end is a
/// `ScriptExhausted` error rather than a panic so tests can exercise the
/// abort path.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Completion>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(replies: impl IntoIterator<Item = Completion>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Script of plain replies, each costing a flat token amount.
    pub fn from_lines(lines: &[&str], tokens_each: u64) -> Self {
        Self::new(
            lines
                .iter()
                .map(|line| Completion::new(*line, tokens_each)),
        )
    }

    /// Number of completions handed out so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn model(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _transcript: &[Message]) -> Result<Completion, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .expect("scripted provider lock poisoned")
            .pop_front()
            .ok_or(ProviderError::ScriptExhausted)
    }
}
