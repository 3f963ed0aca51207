//! Concurrent generation pipeline orchestrator for reqiq
//!
//! The pipeline takes raw stakeholder text plus a resolved domain and drives
//! the requested independent artifact tasks (BRD, FRD, agile backlog)
//! concurrently on a bounded worker pool. Every task runs its own
//! call → parse → validate → accept-or-retry loop to a terminal state; the
//! scheduler then joins on the full set (a barrier, not first-wins), digests
//! whatever succeeded, and runs the dependent tasks (gap analysis, then risk
//! register) strictly in sequence against that digest.
//!
//! Task failures never abort the run. They land in the run's error list and
//! the corresponding artifact is simply absent; the completeness score and
//! telemetry describe what actually happened.

mod aggregate;
mod executor;
mod run;
mod scheduler;
mod task;
mod telemetry;


pub use aggregate::{completeness_score, digest, EMPTY_DIGEST};
pub use executor::{ExecutorSettings, TaskExecutor};
pub use run::{PipelineRequest, PipelineRun, TaskSummary};
pub use scheduler::Pipeline;
pub use task::{GenerationTask, TaskStatus};
pub use telemetry::{estimate_cost, total_tokens, AttemptOutcome, UsageRecord};

pub use reqiq_utils::error::PipelineError;
