//! Pipeline request and run model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::TaskStatus;
use crate::telemetry::UsageRecord;
use reqiq_artifacts::{Artifact, ArtifactKind};
use reqiq_domain::Domain;

/// One inbound generation request.
///
/// `input_text` is assumed caller-truncated (the CLI caps it at 100k chars
/// before it gets here); per-kind prompt caps still apply at prompt build.
/// Only independent kinds may be requested — the two dependent kinds are
/// always attempted.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub input_text: String,
    pub domain: Domain,
    pub requested_kinds: Vec<ArtifactKind>,
}

/// Terminal snapshot of one task, kept for inspection and persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub kind: ArtifactKind,
    pub status: TaskStatus,
    pub attempts: u32,
}

/// The finalized result of one end-to-end execution.
///
/// A run may be fully, partially, or minimally populated: `errors` and the
/// presence or absence of each artifact are the partial-failure signal, not
/// an error return. Immutable once handed to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    /// Independent kinds the caller asked for, deduplicated, request order
    pub requested_kinds: Vec<ArtifactKind>,
    pub domain: Domain,
    /// Validated artifacts of every succeeded task, completion order
    pub artifacts: Vec<Artifact>,
    /// Terminal task snapshots: independent set in completion order, then
    /// the dependent tasks in execution order
    pub tasks: Vec<TaskSummary>,
    /// One entry per failed task: "kind: truncated diagnostic"
    pub errors: Vec<String>,
    /// Every attempt of every task, in task-completion order
    pub telemetry: Vec<UsageRecord>,
    /// The digest the dependent stage ended with
    pub digest: String,
    /// Weighted 0..=100 score over succeeded kinds
    pub completeness_score: u32,
    pub total_tokens: u64,
    pub estimated_cost_usd: f64,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl PipelineRun {
    /// The artifact of a kind, if that task succeeded.
    #[must_use]
    pub fn artifact(&self, kind: ArtifactKind) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.kind() == kind)
    }

    /// Terminal snapshot of a kind's task, if it ran.
    #[must_use]
    pub fn task(&self, kind: ArtifactKind) -> Option<&TaskSummary> {
        self.tasks.iter().find(|t| t.kind == kind)
    }

    /// Kinds that produced an artifact.
    #[must_use]
    pub fn succeeded_kinds(&self) -> Vec<ArtifactKind> {
        self.artifacts.iter().map(Artifact::kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqiq_artifacts::gap::GapReport;

    #[test]
    fn lookup_helpers_find_by_kind() {
        let run = PipelineRun {
            requested_kinds: vec![ArtifactKind::Brd],
            domain: Domain::Generic,
            artifacts: vec![Artifact::Gap(GapReport { gaps: vec![] })],
            tasks: vec![TaskSummary {
                kind: ArtifactKind::Gap,
                status: TaskStatus::Succeeded,
                attempts: 1,
            }],
            errors: vec![],
            telemetry: vec![],
            digest: String::new(),
            completeness_score: 10,
            total_tokens: 0,
            estimated_cost_usd: 0.0,
            started_at: Utc::now(),
            duration_ms: 0,
        };

        assert!(run.artifact(ArtifactKind::Gap).is_some());
        assert!(run.artifact(ArtifactKind::Brd).is_none());
        assert_eq!(run.task(ArtifactKind::Gap).unwrap().attempts, 1);
        assert_eq!(run.succeeded_kinds(), vec![ArtifactKind::Gap]);
    }
}
