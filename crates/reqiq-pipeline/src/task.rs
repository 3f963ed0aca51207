//! Generation task state machine.

use serde::{Deserialize, Serialize};

use crate::telemetry::UsageRecord;
use reqiq_artifacts::{Artifact, ArtifactKind};

/// Lifecycle of one generation task.
///
/// `Pending → Running → (Retrying → Running)* → Succeeded | Failed`.
/// `Succeeded` and `Failed` are terminal; once a task reaches either it is
/// immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Running,
    Retrying,
    Succeeded,
    Failed,
}

impl TaskStatus {
    /// Whether this is a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// One unit of work producing one artifact.
///
/// The task owns its attempt counter, usage log, and eventual result. It is
/// only ever mutated by the executor that drives it; nothing is shared
/// across tasks.
#[derive(Debug)]
pub struct GenerationTask {
    kind: ArtifactKind,
    status: TaskStatus,
    attempt: u32,
    max_attempts: u32,
    artifact: Option<Artifact>,
    error: Option<String>,
    records: Vec<UsageRecord>,
}

impl GenerationTask {
    /// Create a pending task. `max_attempts` is `max_retries + 1` and must
    /// be at least 1.
    #[must_use]
    pub fn new(kind: ArtifactKind, max_attempts: u32) -> Self {
        Self {
            kind,
            status: TaskStatus::Pending,
            attempt: 0,
            max_attempts: max_attempts.max(1),
            artifact: None,
            error: None,
            records: Vec::new(),
        }
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Attempts made so far (0 until the first call starts).
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// The validated artifact; present exactly when the task succeeded.
    pub fn artifact(&self) -> Option<&Artifact> {
        self.artifact.as_ref()
    }

    /// Terminal failure description; present exactly when the task failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn records(&self) -> &[UsageRecord] {
        &self.records
    }

    /// Consume the task into its artifact and usage log.
    #[must_use]
    pub fn into_parts(self) -> (Option<Artifact>, Option<String>, Vec<UsageRecord>) {
        (self.artifact, self.error, self.records)
    }

    /// Whether another attempt is allowed after a validation failure.
    pub(crate) fn can_retry(&self) -> bool {
        self.attempt < self.max_attempts
    }

    /// Start the next attempt. Terminal tasks are immutable; calling this on
    /// one is a bug in the executor.
    pub(crate) fn begin_attempt(&mut self) {
        debug_assert!(!self.is_terminal(), "attempt started on a terminal task");
        debug_assert!(self.attempt < self.max_attempts, "attempt budget exceeded");
        self.attempt += 1;
        self.status = TaskStatus::Running;
    }

    pub(crate) fn mark_retrying(&mut self) {
        debug_assert_eq!(self.status, TaskStatus::Running);
        self.status = TaskStatus::Retrying;
    }

    pub(crate) fn mark_succeeded(&mut self, artifact: Artifact) {
        debug_assert!(!self.is_terminal());
        self.artifact = Some(artifact);
        self.status = TaskStatus::Succeeded;
    }

    pub(crate) fn mark_failed(&mut self, error: String) {
        debug_assert!(!self.is_terminal());
        self.error = Some(error);
        self.status = TaskStatus::Failed;
    }

    pub(crate) fn push_record(&mut self, record: UsageRecord) {
        self.records.push(record);
    }
}
