//! Per-attempt usage accounting.

use serde::{Deserialize, Serialize};

use reqiq_artifacts::ArtifactKind;
use reqiq_config::PricingTable;

/// Outcome of a single generation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// Output parsed and passed the contract
    Accepted,
    /// Transport succeeded but output failed the contract
    Rejected,
    /// The call itself failed; token counts are zero
    TransportFailed,
}

/// One telemetry row per attempt, successful or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub kind: ArtifactKind,
    pub model: String,
    /// 1-based attempt number within the owning task
    pub attempt: u32,
    pub tokens_input: u64,
    pub tokens_output: u64,
    pub tokens_total: u64,
    pub latency_ms: u64,
    pub outcome: AttemptOutcome,
}

impl UsageRecord {
    /// Row for an attempt whose call never produced usage data.
    #[must_use]
    pub fn transport_failure(kind: ArtifactKind, model: impl Into<String>, attempt: u32) -> Self {
        Self {
            kind,
            model: model.into(),
            attempt,
            tokens_input: 0,
            tokens_output: 0,
            tokens_total: 0,
            latency_ms: 0,
            outcome: AttemptOutcome::TransportFailed,
        }
    }
}

/// Sum of `tokens_total` over all records, failed attempts included.
#[must_use]
pub fn total_tokens(records: &[UsageRecord]) -> u64 {
    records.iter().map(|r| r.tokens_total).sum()
}

/// Estimated spend in USD across all records.
///
/// Each record is priced by its own model; models missing from the table use
/// the default entry. Prices are USD per million tokens.
#[must_use]
pub fn estimate_cost(records: &[UsageRecord], pricing: &PricingTable) -> f64 {
    records
        .iter()
        .map(|r| {
            let price = pricing.price_for(&r.model);
            (r.tokens_input as f64 / 1_000_000.0) * price.input_per_mtok
                + (r.tokens_output as f64 / 1_000_000.0) * price.output_per_mtok
        })
        .sum()
}
