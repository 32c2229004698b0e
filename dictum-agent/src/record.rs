//! Run records: the durable summary handed off when a session finishes.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dictum_core::Message;

use crate::budget::{FinishReason, SessionBudget};

/// Everything needed to audit or replay a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub model: String,
    pub prompt: String,
    pub budget: SessionBudget,
    pub finish_reason: FinishReason,
    pub step_count: u32,
    pub total_tokens: u64,
    /// Output of the last successful command before the run ended.
    pub final_answer: String,
    pub transcript: Vec<Message>,
}

/// Destination for finished run records.
#[async_trait]
pub trait RunSink: Send + Sync {
    async fn record(&self, record: RunRecord);
}

/// In-memory sink for tests and embedders that inspect runs directly.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<RunRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<RunRecord> {
        self.records
            .lock()
            .expect("memory sink lock poisoned")
            .clone()
    }
}

#[async_trait]
impl RunSink for MemorySink {
    async fn record(&self, record: RunRecord) {
        self.records
            .lock()
            .expect("memory sink lock poisoned")
            .push(record);
    }
}
