//! Stage scheduler: concurrent independent stage, barrier, sequential
//! dependent stage, finalization.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::aggregate::{completeness_score, digest};
use crate::executor::{ExecutorSettings, TaskExecutor};
use crate::run::{PipelineRequest, PipelineRun, TaskSummary};
use crate::task::GenerationTask;
use crate::telemetry::{estimate_cost, total_tokens, UsageRecord};
use reqiq_artifacts::prompts::PromptInputs;
use reqiq_artifacts::{Artifact, ArtifactKind};
use reqiq_config::{Config, PricingTable};
use reqiq_llm::LlmBackend;
use reqiq_utils::error::{LlmError, PipelineError};

/// The pipeline orchestrator.
///
/// Owns one executor (and through it the shared backend) plus the run
/// parameters; each [`run`](Self::run) call produces one independent
/// [`PipelineRun`]. The pipeline itself is stateless across runs and can be
/// shared behind an `Arc`.
pub struct Pipeline {
    executor: Arc<TaskExecutor>,
    workers: usize,
    max_attempts: u32,
    pricing: PricingTable,
}

impl Pipeline {
    /// Build a pipeline over an already-constructed backend.
    #[must_use]
    pub fn new(backend: Arc<dyn LlmBackend>, config: &Config) -> Self {
        let settings = ExecutorSettings {
            max_attempts: config.pipeline.max_retries + 1,
            call_timeout: std::time::Duration::from_secs(config.pipeline.call_timeout_secs),
            temperature: config.pipeline.temperature,
            max_output_tokens: config.pipeline.max_output_tokens,
            model: String::new(),
        };

        Self {
            executor: Arc::new(TaskExecutor::new(backend, settings)),
            workers: config.pipeline.workers,
            max_attempts: config.pipeline.max_retries + 1,
            pricing: config.pricing.clone(),
        }
    }

    /// Build a pipeline with the backend selected by configuration.
    ///
    /// # Errors
    /// Returns `LlmError` when the configured backend cannot be constructed.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let backend = reqiq_llm::from_config(config)?;
        Ok(Self::new(backend, config))
    }

    /// Run the full pipeline without external cancellation.
    ///
    /// # Errors
    /// Only [`PipelineError::NothingRequested`] — every task-level failure
    /// is recovered into the run itself.
    pub async fn run(&self, request: PipelineRequest) -> Result<PipelineRun, PipelineError> {
        self.run_with_cancel(request, CancellationToken::new())
            .await
    }

    /// Run the full pipeline under a caller-owned cancellation token.
    ///
    /// Cancelling fails remaining tasks with a cancellation diagnostic but
    /// still finalizes and returns the run. There is no other run-level
    /// deadline; per-call timeouts are the only time bound.
    ///
    /// # Errors
    /// Only [`PipelineError::NothingRequested`].
    pub async fn run_with_cancel(
        &self,
        request: PipelineRequest,
        cancel: CancellationToken,
    ) -> Result<PipelineRun, PipelineError> {
        let requested = Self::normalize_kinds(&request.requested_kinds);
        if requested.is_empty() {
            return Err(PipelineError::NothingRequested);
        }

        let started_at = Utc::now();
        let started = Instant::now();
        info!(
            kinds = ?requested,
            domain = %request.domain,
            input_chars = request.input_text.chars().count(),
            "pipeline run starting"
        );

        let input_text: Arc<str> = Arc::from(request.input_text.as_str());
        let domain = request.domain;

        // Independent stage: bounded worker pool, results funneled through a
        // channel into this collector. The channel is the only thing the
        // workers share.
        let completed = self
            .run_independent_stage(&requested, &input_text, domain, &cancel)
            .await;

        let mut artifacts: Vec<Artifact> = Vec::new();
        let mut tasks: Vec<TaskSummary> = Vec::new();
        let mut errors: Vec<String> = Vec::new();
        let mut telemetry: Vec<UsageRecord> = Vec::new();

        for task in completed {
            Self::absorb(task, &mut artifacts, &mut tasks, &mut errors, &mut telemetry);
        }

        // Dependent stage: strictly sequential, each task consuming the
        // digest as it stands when that task starts. A dependent failure
        // does not block the next dependent task.
        let mut current_digest = digest(&artifacts);
        for kind in ArtifactKind::dependent_kinds() {
            debug!(kind = %kind, digest = %current_digest, "dependent task starting");
            let inputs = PromptInputs {
                domain,
                input_text: &input_text,
                digest: &current_digest,
            };
            let task = self.executor.execute(kind, inputs, &cancel).await;
            Self::absorb(task, &mut artifacts, &mut tasks, &mut errors, &mut telemetry);
            current_digest = digest(&artifacts);
        }

        let score = completeness_score(artifacts.iter().map(Artifact::kind));
        let run = PipelineRun {
            requested_kinds: requested,
            domain,
            completeness_score: score,
            total_tokens: total_tokens(&telemetry),
            estimated_cost_usd: estimate_cost(&telemetry, &self.pricing),
            digest: current_digest,
            artifacts,
            tasks,
            errors,
            telemetry,
            started_at,
            duration_ms: started.elapsed().as_millis() as u64,
        };

        info!(
            score = run.completeness_score,
            artifacts = run.artifacts.len(),
            errors = run.errors.len(),
            total_tokens = run.total_tokens,
            duration_ms = run.duration_ms,
            "pipeline run finished"
        );

        Ok(run)
    }

    /// Run every requested independent task on the worker pool and wait for
    /// all of them: a full barrier. No failure aborts a sibling, and no
    /// cancellation is propagated between siblings.
    async fn run_independent_stage(
        &self,
        requested: &[ArtifactKind],
        input_text: &Arc<str>,
        domain: reqiq_domain::Domain,
        cancel: &CancellationToken,
    ) -> Vec<GenerationTask> {
        let pool = Arc::new(Semaphore::new(self.workers));
        let (tx, mut rx) = mpsc::channel::<GenerationTask>(requested.len().max(1));

        for kind in requested.iter().copied() {
            let pool = Arc::clone(&pool);
            let tx = tx.clone();
            let executor = Arc::clone(&self.executor);
            let input_text = Arc::clone(input_text);
            let cancel = cancel.clone();

            tokio::spawn(async move {
                let Ok(_permit) = pool.acquire().await else {
                    // Pool is never closed while workers are live
                    return;
                };
                let inputs = PromptInputs {
                    domain,
                    input_text: &input_text,
                    digest: "",
                };
                let task = executor.execute(kind, inputs, &cancel).await;
                let _ = tx.send(task).await;
            });
        }
        drop(tx);

        let mut completed = Vec::with_capacity(requested.len());
        while let Some(task) = rx.recv().await {
            debug!(
                kind = %task.kind(),
                status = ?task.status(),
                attempts = task.attempt(),
                "independent task settled"
            );
            completed.push(task);
        }

        if completed.len() != requested.len() {
            // Only reachable if a worker panicked; the run still finalizes
            // with whatever settled.
            warn!(
                settled = completed.len(),
                requested = requested.len(),
                "independent stage lost workers"
            );
        }

        completed
    }

    /// Fold one terminal task into the run accumulators.
    fn absorb(
        task: GenerationTask,
        artifacts: &mut Vec<Artifact>,
        tasks: &mut Vec<TaskSummary>,
        errors: &mut Vec<String>,
        telemetry: &mut Vec<UsageRecord>,
    ) {
        tasks.push(TaskSummary {
            kind: task.kind(),
            status: task.status(),
            attempts: task.attempt(),
        });

        let kind = task.kind();
        let (artifact, error, records) = task.into_parts();
        telemetry.extend(records);

        if let Some(artifact) = artifact {
            artifacts.push(artifact);
        }
        if let Some(error) = error {
            errors.push(format!("{kind}: {error}"));
        }
    }

    /// Deduplicate while preserving request order, dropping any dependent
    /// kinds a caller slipped in (those always run, and only once).
    fn normalize_kinds(requested: &[ArtifactKind]) -> Vec<ArtifactKind> {
        let mut seen = std::collections::BTreeSet::new();
        requested
            .iter()
            .copied()
            .filter(|kind| kind.is_independent() && seen.insert(*kind))
            .collect()
    }

    /// Attempt budget per task, exposed for assertions.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}
