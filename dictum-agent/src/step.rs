//! One bounded request/validate/dispatch/retry cycle.

use dictum_core::{Engine, ExecutionOutcome, Message, ReplyNormalizer, StopSignal};

use crate::budget::SessionBudget;
use crate::provider::CompletionProvider;
use crate::SessionError;

/// A normalized reply shorter than this cannot be a command.
const MIN_REPLY_LEN: usize = 2;

/// Result of one step. Scratch messages generated during failed tries are
/// discarded whether the step succeeds or aborts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub aborted: bool,
    /// Normalized reply that was accepted, empty on abort.
    pub reply: String,
    /// Output of the dispatched command, empty on abort.
    pub output: String,
}

impl StepOutcome {
    fn aborted() -> Self {
        Self {
            aborted: true,
            reply: String::new(),
            output: String::new(),
        }
    }
}

/// Borrows the session's moving parts for the duration of one step.
pub struct StepController<'s> {
    pub engine: &'s mut Engine,
    pub provider: &'s dyn CompletionProvider,
    pub normalizer: &'s ReplyNormalizer,
    pub budget: &'s SessionBudget,
    pub stop: &'s StopSignal,
}

impl StepController<'_> {
    /// Drive the provider until one command executes successfully or the step
    /// gives up. Failed tries push corrective context onto a scratch copy of
    /// the transcript only; the persistent transcript is untouched.
    pub async fn run(
        &mut self,
        transcript: &[Message],
        total_tokens: &mut u64,
    ) -> Result<StepOutcome, SessionError> {
        let mut scratch = transcript.to_vec();
        let mut tries: u32 = 0;
        loop {
            if self.stop.is_raised() {
                return Ok(StepOutcome::aborted());
            }
            tries += 1;
            if tries > self.budget.max_tries {
                tracing::warn!(max_tries = self.budget.max_tries, "step retries exhausted");
                return Ok(StepOutcome::aborted());
            }
            if *total_tokens >= self.budget.max_session_tokens {
                tracing::warn!(
                    total_tokens = *total_tokens,
                    max_session_tokens = self.budget.max_session_tokens,
                    "session token budget exhausted"
                );
                return Ok(StepOutcome::aborted());
            }

            let completion = match self.provider.complete(&scratch).await {
                Ok(completion) => completion,
                Err(error) => {
                    tracing::error!(error = %error, "completion request failed");
                    return Ok(StepOutcome::aborted());
                }
            };
            *total_tokens += completion.tokens_used;

            let reply = self.normalizer.normalize(&completion.text);
            if reply.len() < MIN_REPLY_LEN {
                tracing::warn!(raw = %completion.text, "reply too short to be a command");
                return Ok(StepOutcome::aborted());
            }

            match self.engine.execute(&reply)? {
                ExecutionOutcome::Success(output) => {
                    return Ok(StepOutcome {
                        aborted: false,
                        reply,
                        output,
                    });
                }
                ExecutionOutcome::Error(message) => {
                    tracing::debug!(reply = %reply, tries, "command rejected, retrying");
                    scratch.push(Message::assistant(reply));
                    scratch.push(Message::user(message));
                }
            }
        }
    }
}
