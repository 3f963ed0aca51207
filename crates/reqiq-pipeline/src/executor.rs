//! Drives one generation task to a terminal state.
//!
//! Per attempt: build the prompt (with a corrective instruction from attempt
//! two onward), call the backend, then parse and contract-validate the
//! output. Contract violations are retried up to the attempt budget;
//! transport failures are terminal immediately — the retry policy is
//! deliberately asymmetric and belongs to this executor, never to backends.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::task::GenerationTask;
use crate::telemetry::{AttemptOutcome, UsageRecord};
use reqiq_artifacts::contract::parse_artifact;
use reqiq_artifacts::prompts::{build_prompts, PromptInputs};
use reqiq_artifacts::ArtifactKind;
use reqiq_llm::{LlmBackend, LlmInvocation, Message};
use reqiq_utils::error::TaskFailure;
use reqiq_utils::text::truncate_diagnostic;

/// Call parameters shared by every task of a run.
#[derive(Debug, Clone)]
pub struct ExecutorSettings {
    /// Attempt budget per task: `max_retries + 1`
    pub max_attempts: u32,
    /// Per-call timeout
    pub call_timeout: Duration,
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// Model override; empty selects the backend default
    pub model: String,
}

/// Executes generation tasks against one shared backend.
pub struct TaskExecutor {
    backend: Arc<dyn LlmBackend>,
    settings: ExecutorSettings,
}

impl TaskExecutor {
    #[must_use]
    pub fn new(backend: Arc<dyn LlmBackend>, settings: ExecutorSettings) -> Self {
        Self { backend, settings }
    }

    /// Run one task to its terminal state.
    ///
    /// Never returns an error: every failure mode is absorbed into the
    /// returned task's terminal state and usage log. Cancellation is
    /// observed between and during calls; a cancelled task fails with a
    /// cancellation diagnostic.
    pub async fn execute(
        &self,
        kind: ArtifactKind,
        inputs: PromptInputs<'_>,
        cancel: &CancellationToken,
    ) -> GenerationTask {
        let mut task = GenerationTask::new(kind, self.settings.max_attempts);
        let mut corrective: Option<String> = None;

        loop {
            if cancel.is_cancelled() {
                task.mark_failed("run cancelled".to_string());
                return task;
            }

            task.begin_attempt();
            let attempt = task.attempt();
            debug!(kind = %kind, attempt, "starting generation attempt");

            let prompts = build_prompts(kind, inputs, corrective.as_deref());
            let invocation = LlmInvocation::new(
                kind.as_str(),
                self.settings.model.clone(),
                self.settings.call_timeout,
                vec![
                    Message::system(prompts.system),
                    Message::user(prompts.user),
                ],
                self.settings.max_output_tokens,
                self.settings.temperature,
            );

            let completion = tokio::select! {
                () = cancel.cancelled() => {
                    task.push_record(UsageRecord::transport_failure(
                        kind,
                        self.record_model_for_failure(),
                        attempt,
                    ));
                    task.mark_failed("run cancelled".to_string());
                    return task;
                }
                result = self.backend.invoke(invocation) => match result {
                    Ok(completion) => completion,
                    Err(err) => {
                        // Transport failures are terminal: no retry, token
                        // counts zero, exactly one attempt on record.
                        warn!(kind = %kind, attempt, error = %err, "transport failure");
                        task.push_record(UsageRecord::transport_failure(
                            kind,
                            self.record_model_for_failure(),
                            attempt,
                        ));
                        let failure = TaskFailure::Transport(err);
                        task.mark_failed(truncate_diagnostic(&failure.to_string()).to_string());
                        return task;
                    }
                },
            };

            match parse_artifact(kind, &completion.raw_response) {
                Ok(artifact) => {
                    debug!(
                        kind = %kind,
                        attempt,
                        tokens = completion.tokens_total(),
                        "attempt accepted"
                    );
                    task.push_record(Self::usage_row(
                        kind,
                        attempt,
                        &completion,
                        AttemptOutcome::Accepted,
                    ));
                    task.mark_succeeded(artifact);
                    return task;
                }
                Err(violation) => {
                    task.push_record(Self::usage_row(
                        kind,
                        attempt,
                        &completion,
                        AttemptOutcome::Rejected,
                    ));

                    if task.can_retry() {
                        debug!(kind = %kind, attempt, violation = %violation, "attempt rejected, retrying");
                        corrective = Some(violation.to_string());
                        task.mark_retrying();
                    } else {
                        warn!(kind = %kind, attempt, violation = %violation, "retries exhausted");
                        let failure = TaskFailure::ExhaustedRetries {
                            attempts: attempt,
                            last: violation,
                        };
                        task.mark_failed(truncate_diagnostic(&failure.to_string()).to_string());
                        return task;
                    }
                }
            }
        }
    }

    fn usage_row(
        kind: ArtifactKind,
        attempt: u32,
        completion: &reqiq_llm::LlmCompletion,
        outcome: AttemptOutcome,
    ) -> UsageRecord {
        UsageRecord {
            kind,
            model: completion.model_used.clone(),
            attempt,
            tokens_input: completion.tokens_input,
            tokens_output: completion.tokens_output,
            tokens_total: completion.tokens_total(),
            latency_ms: completion.latency.as_millis() as u64,
            outcome,
        }
    }

    /// Model name recorded when no completion exists to report one.
    fn record_model_for_failure(&self) -> String {
        if self.settings.model.is_empty() {
            format!("{}:default", self.backend.provider())
        } else {
            self.settings.model.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqiq_domain::Domain;
    use reqiq_llm::FixtureBackend;

    fn settings(max_attempts: u32) -> ExecutorSettings {
        ExecutorSettings {
            max_attempts,
            call_timeout: Duration::from_secs(45),
            temperature: 0.3,
            max_output_tokens: 3500,
            model: String::new(),
        }
    }

    fn inputs() -> PromptInputs<'static> {
        PromptInputs {
            domain: Domain::Generic,
            input_text: "Build a customer portal with ticket tracking.",
            digest: "",
        }
    }

    #[tokio::test]
    async fn valid_output_succeeds_on_first_attempt() {
        let executor = TaskExecutor::new(Arc::new(FixtureBackend::canned()), settings(3));
        let task = executor
            .execute(ArtifactKind::Brd, inputs(), &CancellationToken::new())
            .await;

        assert_eq!(task.status(), crate::task::TaskStatus::Succeeded);
        assert_eq!(task.attempt(), 1);
        assert_eq!(task.records().len(), 1);
        assert_eq!(task.records()[0].outcome, AttemptOutcome::Accepted);
        assert!(task.records()[0].tokens_total > 0);
    }

    #[tokio::test]
    async fn invalid_output_exhausts_the_attempt_budget() {
        let backend = FixtureBackend::canned().with_response("frd", "not json at all");
        let executor = TaskExecutor::new(Arc::new(backend), settings(3));
        let task = executor
            .execute(ArtifactKind::Frd, inputs(), &CancellationToken::new())
            .await;

        assert_eq!(task.status(), crate::task::TaskStatus::Failed);
        assert_eq!(task.attempt(), 3);
        assert_eq!(task.records().len(), 3);
        assert!(task
            .records()
            .iter()
            .all(|r| r.outcome == AttemptOutcome::Rejected));
        assert!(task.error().unwrap().contains("3 attempt(s)"));
    }

    #[tokio::test]
    async fn transport_failure_is_terminal_on_attempt_one() {
        // No canned response for this kind makes the fixture backend fail
        // the call itself, standing in for a transport error.
        let executor = TaskExecutor::new(Arc::new(FixtureBackend::new()), settings(3));
        let task = executor
            .execute(ArtifactKind::Agile, inputs(), &CancellationToken::new())
            .await;

        assert_eq!(task.status(), crate::task::TaskStatus::Failed);
        assert_eq!(task.attempt(), 1);
        assert_eq!(task.records().len(), 1);
        assert_eq!(task.records()[0].outcome, AttemptOutcome::TransportFailed);
        assert_eq!(task.records()[0].tokens_total, 0);
        assert!(task.error().unwrap().contains("transport failure"));
    }

    #[tokio::test]
    async fn cancelled_token_fails_the_task_without_calling() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let executor = TaskExecutor::new(Arc::new(FixtureBackend::canned()), settings(3));
        let task = executor.execute(ArtifactKind::Brd, inputs(), &cancel).await;

        assert_eq!(task.status(), crate::task::TaskStatus::Failed);
        assert_eq!(task.attempt(), 0);
        assert!(task.records().is_empty());
        assert_eq!(task.error(), Some("run cancelled"));
    }

    #[tokio::test]
    async fn failure_diagnostic_is_truncated() {
        let huge_garbage = format!("{{\"x\": \"{}\"", "a".repeat(1000));
        let backend = FixtureBackend::canned().with_response("gap", huge_garbage);
        let executor = TaskExecutor::new(Arc::new(backend), settings(1));
        let task = executor
            .execute(ArtifactKind::Gap, inputs(), &CancellationToken::new())
            .await;

        assert_eq!(task.status(), crate::task::TaskStatus::Failed);
        assert!(task.error().unwrap().chars().count() <= 200);
    }
}
