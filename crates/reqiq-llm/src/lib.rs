//! Generation service backends for reqiq
//!
//! This module provides a trait-based system for invoking text-generation
//! providers over HTTP. All providers implement the [`LlmBackend`] trait,
//! allowing the pipeline to work with any provider without knowing
//! implementation details.
//!
//! Backends perform exactly one call per [`LlmBackend::invoke`]: the
//! pipeline's retry policy applies to contract-validation failures only, so
//! a backend that silently retried transport failures would change run
//! semantics behind the orchestrator's back.

mod anthropic_backend;
mod fixture_backend;
mod openrouter_backend;
mod types;

pub use fixture_backend::FixtureBackend;
pub use reqiq_utils::error::LlmError;
pub use types::{LlmBackend, LlmCompletion, LlmInvocation, Message, Role};

pub(crate) use anthropic_backend::AnthropicBackend;
pub(crate) use openrouter_backend::OpenRouterBackend;

use reqiq_config::Config;
use std::sync::Arc;

/// Create an LLM backend from configuration.
///
/// Supported providers: `anthropic`, `openrouter`, and `fixture` (a
/// deterministic offline backend for dry runs and tests). Defaults to
/// `anthropic` when no provider is configured.
///
/// # Errors
///
/// Returns `LlmError::Unsupported` for an unknown provider, or
/// `LlmError::Misconfiguration` when provider-specific configuration is
/// invalid (missing API key environment variable, missing model).
pub fn from_config(config: &Config) -> Result<Arc<dyn LlmBackend>, LlmError> {
    let provider = config.llm.provider.as_deref().unwrap_or("anthropic");

    match provider {
        "anthropic" => {
            let backend = AnthropicBackend::new_from_config(config)?;
            Ok(Arc::new(backend))
        }
        "openrouter" => {
            let backend = OpenRouterBackend::new_from_config(config)?;
            Ok(Arc::new(backend))
        }
        "fixture" => Ok(Arc::new(FixtureBackend::canned())),
        unknown => Err(LlmError::Unsupported(format!(
            "Unknown LLM provider '{}'. Supported providers: anthropic, openrouter, fixture.",
            unknown
        ))),
    }
}

#[cfg(test)]
mod factory_tests {
    use super::*;

    #[test]
    fn fixture_provider_constructs_without_environment() {
        let config = Config::minimal_for_testing();
        assert!(from_config(&config).is_ok());
    }

    #[test]
    fn unknown_provider_fails_cleanly() {
        let mut config = Config::minimal_for_testing();
        config.llm.provider = Some("invalid-provider".to_string());

        match from_config(&config) {
            Err(LlmError::Unsupported(msg)) => {
                assert!(msg.contains("invalid-provider"));
                assert!(msg.contains("Unknown LLM provider"));
            }
            _ => panic!("Expected LlmError::Unsupported for invalid-provider"),
        }
    }

    #[test]
    fn anthropic_without_model_is_misconfiguration() {
        let mut config = Config::minimal_for_testing();
        config.llm.provider = Some("anthropic".to_string());
        config.llm.anthropic = None;

        match from_config(&config) {
            Err(LlmError::Misconfiguration(msg)) => {
                assert!(msg.contains("model") || msg.contains("API key"));
            }
            other => panic!("Expected Misconfiguration, got {:?}", other.err()),
        }
    }
}
