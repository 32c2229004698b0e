//! Whole-session orchestration: bootstrap replay, the step loop, finish
//! classification and the run-record handoff.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use dictum_core::builtins::STOP_NAME;
use dictum_core::{Engine, ExecutionOutcome, Message, ReplyNormalizer, StopSignal, Transcript};

use crate::budget::{FinishReason, RunState, SessionBudget};
use crate::provider::CompletionProvider;
use crate::record::{RunRecord, RunSink};
use crate::step::StepController;
use crate::SessionError;

/// What a finished run hands back to the caller. The full transcript stays on
/// the controller and in the run record.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub session_id: Uuid,
    pub finish_reason: FinishReason,
    /// Output of the last successful command before the run ended.
    pub final_output: String,
    pub step_count: u32,
    pub total_tokens: u64,
}

/// Owns one engine and drives it against a provider until the session stops,
/// exhausts its budget, or aborts.
pub struct RunController {
    engine: Engine,
    provider: Arc<dyn CompletionProvider>,
    normalizer: ReplyNormalizer,
    budget: SessionBudget,
    stop: StopSignal,
    system_prompt: String,
    bootstrap: Vec<String>,
    prompt: Option<String>,
    sink: Option<Arc<dyn RunSink>>,
    transcript: Transcript,
}

impl RunController {
    /// Takes ownership of the engine and binds it to a fresh stop signal.
    /// The caller is expected to have read `engine.help()` while composing
    /// the system prompt; `execute` enforces that.
    pub fn new(
        mut engine: Engine,
        provider: Arc<dyn CompletionProvider>,
        system_prompt: impl Into<String>,
    ) -> Self {
        let stop = StopSignal::new();
        engine.bind(stop.clone());
        Self {
            engine,
            provider,
            normalizer: ReplyNormalizer::default(),
            budget: SessionBudget::default(),
            stop,
            system_prompt: system_prompt.into(),
            bootstrap: Vec::new(),
            prompt: None,
            sink: None,
            transcript: Vec::new(),
        }
    }

    pub fn with_budget(mut self, budget: SessionBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Commands replayed through the engine before the goal prompt, seeding
    /// deterministic history.
    pub fn with_bootstrap(mut self, commands: Vec<String>) -> Self {
        self.bootstrap = commands;
        self
    }

    /// The goal the session works towards. Required before `run`.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn RunSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_normalizer(mut self, normalizer: ReplyNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Run the session to completion. Restartable: each call starts from a
    /// cleared transcript and stop signal. Engine state persists across runs
    /// on the same controller; it belongs to the embedder.
    pub async fn run(&mut self) -> Result<RunOutcome, SessionError> {
        let prompt = self.prompt.clone().ok_or(SessionError::MissingPrompt)?;
        let session_id = Uuid::new_v4();
        self.stop.clear();
        self.transcript.clear();
        self.build_initial_transcript(&prompt)?;

        let mut run = RunState::default();
        loop {
            if self.stop.is_raised() {
                run.finish_reason = Some(FinishReason::Completed);
                break;
            }
            if run.step_count >= self.budget.max_steps {
                run.finish_reason = Some(FinishReason::Exhausted);
                break;
            }

            let step = StepController {
                engine: &mut self.engine,
                provider: self.provider.as_ref(),
                normalizer: &self.normalizer,
                budget: &self.budget,
                stop: &self.stop,
            }
            .run(&self.transcript, &mut run.total_tokens)
            .await?;

            if step.aborted {
                run.finish_reason = Some(FinishReason::Aborted);
                break;
            }
            if self.stop.is_raised() {
                // The stop command's own reply/output pair stays out of the
                // transcript; the last real output is the final answer.
                run.finish_reason = Some(FinishReason::Completed);
                break;
            }

            run.last_output = step.output.clone();
            run.step_count += 1;
            self.transcript.push(Message::assistant(step.reply));
            self.transcript.push(Message::user(step.output));
        }

        let finish_reason = run.finish_reason.unwrap_or(FinishReason::Completed);
        tracing::info!(
            session = %session_id,
            finish_reason = %finish_reason,
            steps = run.step_count,
            tokens = run.total_tokens,
            "session finished"
        );

        let record = RunRecord {
            session_id,
            created_at: Utc::now(),
            model: self.provider.model().to_string(),
            prompt,
            budget: self.budget,
            finish_reason,
            step_count: run.step_count,
            total_tokens: run.total_tokens,
            final_answer: run.last_output.clone(),
            transcript: self.transcript.clone(),
        };
        if let Some(sink) = &self.sink {
            sink.record(record).await;
        }

        Ok(RunOutcome {
            session_id,
            finish_reason,
            final_output: run.last_output,
            step_count: run.step_count,
            total_tokens: run.total_tokens,
        })
    }

    /// System message, bootstrap replay, then the goal prompt. A literal stop
    /// command in the bootstrap is recorded as a free no-op success so
    /// scripted setup cannot end the session before it starts.
    fn build_initial_transcript(&mut self, prompt: &str) -> Result<(), SessionError> {
        self.transcript.push(Message::system(&self.system_prompt));
        let stop_noop = format!("{STOP_NAME}()");
        for command in self.bootstrap.clone() {
            if command == stop_noop {
                self.transcript.push(Message::assistant(command));
                self.transcript.push(Message::user(""));
                continue;
            }
            match self.engine.execute(&command)? {
                ExecutionOutcome::Success(output) => {
                    self.transcript.push(Message::assistant(command));
                    self.transcript.push(Message::user(output));
                }
                ExecutionOutcome::Error(message) => {
                    return Err(SessionError::Bootstrap { command, message });
                }
            }
        }
        self.transcript.push(Message::user(prompt));
        Ok(())
    }
}
