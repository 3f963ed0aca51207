//! Core types for the generation service abstraction

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use reqiq_utils::error::LlmError;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System-level instructions
    System,
    /// User input
    User,
    /// Assistant response
    Assistant,
}

/// A single message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    /// Plain UTF-8 text
    pub content: String,
}

impl Message {
    /// Create a new message
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

/// Input to one generation call.
#[derive(Debug, Clone)]
pub struct LlmInvocation {
    /// Artifact kind this call is generating, for logging and attribution
    pub task_kind: String,
    /// Model to use; empty selects the backend's default
    pub model: String,
    /// Per-call timeout
    pub timeout: Duration,
    /// Ordered conversation messages
    pub messages: Vec<Message>,
    /// Output token cap for this call
    pub max_tokens: u32,
    /// Sampling temperature for this call
    pub temperature: f32,
}

impl LlmInvocation {
    /// Create a new invocation
    #[must_use]
    pub fn new(
        task_kind: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
        messages: Vec<Message>,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            task_kind: task_kind.into(),
            model: model.into(),
            timeout,
            messages,
            max_tokens,
            temperature,
        }
    }
}

/// Result of one successful generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmCompletion {
    /// Raw response text from the provider
    pub raw_response: String,
    /// Provider name ("anthropic", "openrouter", "fixture")
    pub provider: String,
    /// Model that was actually used
    pub model_used: String,
    /// Input tokens consumed
    pub tokens_input: u64,
    /// Output tokens generated
    pub tokens_output: u64,
    /// Wall time of the call
    pub latency: Duration,
}

impl LlmCompletion {
    /// Input plus output tokens.
    #[must_use]
    pub fn tokens_total(&self) -> u64 {
        self.tokens_input + self.tokens_output
    }
}

/// Trait for generation service implementations.
///
/// Invocations are independent: backends hold no per-call state and are
/// shared across concurrent workers by `Arc`.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Perform exactly one generation call.
    ///
    /// # Errors
    ///
    /// Returns an `LlmError` transport variant (`Timeout`, `RateLimited`,
    /// `Unreachable`, `MalformedResponse`) on failure. Backends never retry;
    /// the caller decides what a failure means.
    async fn invoke(&self, inv: LlmInvocation) -> Result<LlmCompletion, LlmError>;

    /// Provider name for telemetry attribution.
    fn provider(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_constructors_set_roles() {
        assert_eq!(Message::system("a").role, Role::System);
        assert_eq!(Message::user("b").role, Role::User);
    }

    #[test]
    fn completion_totals_tokens() {
        let completion = LlmCompletion {
            raw_response: "{}".to_string(),
            provider: "fixture".to_string(),
            model_used: "fixture-model".to_string(),
            tokens_input: 120,
            tokens_output: 30,
            latency: Duration::from_millis(5),
        };
        assert_eq!(completion.tokens_total(), 150);
    }
}
