//! Error types shared across the reqiq workspace.
//!
//! Each layer owns one enum: `LlmError` for the generation-service client,
//! `ContractViolation` for structured-output validation, `TaskFailure` for a
//! task's terminal failure, `ConfigError` for configuration problems, and
//! `PipelineError` for the single caller-visible hard failure. Library code
//! returns these; only the CLI maps them to exit codes.

use std::time::Duration;
use thiserror::Error;

/// Transport-level failure from the generation service client.
///
/// The pipeline treats the four transport variants identically: terminal for
/// the task, never retried. Only validation failures are retried.
#[derive(Error, Debug)]
pub enum LlmError {
    /// The call did not complete within the configured per-call timeout
    #[error("timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// Provider returned 429 or equivalent throttling response
    #[error("rate limited by provider: {0}")]
    RateLimited(String),

    /// Connection, DNS, or non-success HTTP status from the provider
    #[error("provider unreachable: {0}")]
    Unreachable(String),

    /// Response arrived but could not be decoded into a completion
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// Backend construction failed (missing API key, missing model, ...)
    #[error("misconfiguration: {0}")]
    Misconfiguration(String),

    /// Unknown provider or unsupported feature
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl LlmError {
    /// Whether this error can occur during an invocation (as opposed to
    /// backend construction). Invocation errors terminate the owning task.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::RateLimited(_)
                | Self::Unreachable(_)
                | Self::MalformedResponse(_)
        )
    }
}

/// A structured-output contract violation.
///
/// Produced when a raw completion cannot be parsed as JSON or parses but
/// breaks the artifact's schema. Violations are retryable up to the
/// configured attempt budget.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    /// Response body is not valid JSON
    #[error("response is not valid JSON: {0}")]
    NotJson(String),

    /// JSON parsed but does not deserialize into the artifact schema
    #[error("response does not match the {kind} schema: {detail}")]
    SchemaMismatch { kind: String, detail: String },

    /// Deserialized value breaks a semantic rule of the contract
    #[error("contract rule broken for {kind}: {detail}")]
    RuleBroken { kind: String, detail: String },
}

/// Terminal failure of one generation task.
#[derive(Error, Debug)]
pub enum TaskFailure {
    /// Transport failure on the first (and only) attempt
    #[error("transport failure: {0}")]
    Transport(#[from] LlmError),

    /// Every attempt produced output that failed contract validation
    #[error("output failed validation after {attempts} attempt(s): {last}")]
    ExhaustedRetries {
        attempts: u32,
        last: ContractViolation,
    },
}

/// Configuration loading or validation error.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration file {path}: {reason}")]
    InvalidFile { path: String, reason: String },

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("configuration I/O error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// The only hard failure `Pipeline::run` can surface to a caller.
///
/// Everything else is recovered locally into the run's error list.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PipelineError {
    #[error("no artifact kinds requested")]
    NothingRequested,
}
