//! Anthropic HTTP backend implementation
//!
//! HTTP-based backend for Anthropic's Messages API, giving direct access to
//! Claude models through their native API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::types::{LlmBackend, LlmCompletion, LlmInvocation, Message, Role};
use crate::LlmError;
use reqiq_config::Config;

/// Default Anthropic API endpoint
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1/messages";

/// Anthropic API version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic backend configuration
pub(crate) struct AnthropicBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    default_model: String,
}

impl AnthropicBackend {
    /// Create a new Anthropic backend.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the HTTP client cannot be
    /// constructed.
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        default_model: String,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| LlmError::Misconfiguration(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            default_model,
        })
    }

    /// Create a new Anthropic backend from configuration.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the API key environment
    /// variable is not set or no model is configured.
    pub fn new_from_config(config: &Config) -> Result<Self, LlmError> {
        let api_key_env = config
            .llm
            .anthropic
            .as_ref()
            .and_then(|a| a.api_key_env.as_deref())
            .unwrap_or("ANTHROPIC_API_KEY");

        let api_key = std::env::var(api_key_env).map_err(|_| {
            LlmError::Misconfiguration(format!(
                "Anthropic API key not found in environment variable '{}'. \
                 Set this variable or configure a different api_key_env in [llm.anthropic].",
                api_key_env
            ))
        })?;

        let base_url = config
            .llm
            .anthropic
            .as_ref()
            .and_then(|a| a.base_url.clone());

        let default_model = config
            .llm
            .anthropic
            .as_ref()
            .and_then(|a| a.model.clone())
            .ok_or_else(|| {
                LlmError::Misconfiguration(
                    "Anthropic model not specified in configuration. \
                     Set [llm.anthropic] model = \"model-name\"."
                        .to_string(),
                )
            })?;

        Self::new(api_key, base_url, default_model)
    }

    fn resolve_model(&self, inv: &LlmInvocation) -> String {
        if inv.model.is_empty() {
            self.default_model.clone()
        } else {
            inv.model.clone()
        }
    }

    /// Convert messages to Anthropic Messages API format.
    ///
    /// The API takes a `system` field separate from the user/assistant
    /// conversation; multiple system messages are concatenated.
    fn convert_messages(messages: &[Message]) -> (Option<String>, Vec<AnthropicMessage>) {
        let mut system_prompt: Option<String> = None;
        let mut anthropic_messages = Vec::new();

        for msg in messages {
            match msg.role {
                Role::System => {
                    if let Some(existing) = system_prompt.as_mut() {
                        existing.push_str("\n\n");
                        existing.push_str(&msg.content);
                    } else {
                        system_prompt = Some(msg.content.clone());
                    }
                }
                Role::User => anthropic_messages.push(AnthropicMessage {
                    role: "user".to_string(),
                    content: msg.content.clone(),
                }),
                Role::Assistant => anthropic_messages.push(AnthropicMessage {
                    role: "assistant".to_string(),
                    content: msg.content.clone(),
                }),
            }
        }

        (system_prompt, anthropic_messages)
    }

    fn classify_send_error(e: reqwest::Error, inv: &LlmInvocation) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout {
                duration: inv.timeout,
            }
        } else {
            LlmError::Unreachable(e.to_string())
        }
    }
}

#[async_trait]
impl LlmBackend for AnthropicBackend {
    async fn invoke(&self, inv: LlmInvocation) -> Result<LlmCompletion, LlmError> {
        let model = self.resolve_model(&inv);

        debug!(
            provider = "anthropic",
            task_kind = %inv.task_kind,
            model = %model,
            max_tokens = inv.max_tokens,
            temperature = inv.temperature,
            timeout_secs = inv.timeout.as_secs(),
            "Invoking Anthropic backend"
        );

        let (system_prompt, anthropic_messages) = Self::convert_messages(&inv.messages);

        let request_body = AnthropicRequest {
            model: model.clone(),
            messages: anthropic_messages,
            max_tokens: inv.max_tokens,
            temperature: inv.temperature,
            system: system_prompt,
        };

        let started = Instant::now();
        let response = self
            .client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .timeout(inv.timeout)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Self::classify_send_error(e, &inv))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(LlmError::RateLimited(format!(
                "Anthropic returned HTTP 429 for model {model}"
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Unreachable(format!(
                "Anthropic returned HTTP {status}: {body}"
            )));
        }

        let response_body: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(format!("Anthropic response: {e}")))?;
        let latency = started.elapsed();

        // Concatenate all text segments from the content blocks
        let content: String = response_body
            .content
            .iter()
            .filter(|block| block.content_type == "text")
            .filter_map(|block| block.text.as_deref())
            .collect();

        if content.is_empty() {
            return Err(LlmError::MalformedResponse(
                "Anthropic response missing text content".to_string(),
            ));
        }

        let usage = response_body.usage.unwrap_or_default();

        debug!(
            provider = "anthropic",
            tokens_input = usage.input_tokens,
            tokens_output = usage.output_tokens,
            latency_ms = latency.as_millis() as u64,
            "Anthropic invocation completed"
        );

        Ok(LlmCompletion {
            raw_response: content,
            provider: "anthropic".to_string(),
            model_used: model,
            tokens_input: usage.input_tokens,
            tokens_output: usage.output_tokens,
            latency,
        })
    }

    fn provider(&self) -> &str {
        "anthropic"
    }
}

/// Anthropic message format for requests
#[derive(Debug, Clone, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

/// Anthropic request body
#[derive(Debug, Clone, Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
}

/// Anthropic response body
#[derive(Debug, Clone, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

/// Content block in Anthropic response
#[derive(Debug, Clone, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

/// Token usage information
#[derive(Debug, Clone, Default, Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_backend() -> AnthropicBackend {
        AnthropicBackend::new("test-key".to_string(), None, "default-model".to_string()).unwrap()
    }

    #[test]
    fn resolve_model_uses_default_when_empty() {
        let backend = test_backend();
        let inv = LlmInvocation::new("brd", "", Duration::from_secs(45), vec![], 1024, 0.3);
        assert_eq!(backend.resolve_model(&inv), "default-model");
    }

    #[test]
    fn resolve_model_honors_override() {
        let backend = test_backend();
        let inv = LlmInvocation::new(
            "brd",
            "custom-model",
            Duration::from_secs(45),
            vec![],
            1024,
            0.3,
        );
        assert_eq!(backend.resolve_model(&inv), "custom-model");
    }

    #[test]
    fn convert_messages_separates_system() {
        let messages = vec![
            Message::system("You are a senior Business Analyst"),
            Message::user("Analyze the input"),
        ];

        let (system, rest) = AnthropicBackend::convert_messages(&messages);

        assert_eq!(system.as_deref(), Some("You are a senior Business Analyst"));
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].role, "user");
    }

    #[test]
    fn convert_messages_concatenates_multiple_system() {
        let messages = vec![
            Message::system("First"),
            Message::system("Second"),
            Message::user("Hello"),
        ];

        let (system, rest) = AnthropicBackend::convert_messages(&messages);

        assert_eq!(system.as_deref(), Some("First\n\nSecond"));
        assert_eq!(rest.len(), 1);
    }

    #[test]
    fn new_from_config_missing_api_key() {
        let test_env_var = "ANTHROPIC_API_KEY_TEST_MISSING";
        unsafe {
            std::env::remove_var(test_env_var);
        }

        let mut config = Config::minimal_for_testing();
        config.llm.anthropic = Some(reqiq_config::AnthropicConfig {
            api_key_env: Some(test_env_var.to_string()),
            base_url: None,
            model: Some("test-model".to_string()),
        });

        match AnthropicBackend::new_from_config(&config) {
            Err(LlmError::Misconfiguration(msg)) => {
                assert!(msg.contains(test_env_var));
                assert!(msg.contains("not found"));
            }
            _ => panic!("Expected Misconfiguration error for missing API key"),
        }
    }

    #[test]
    fn new_from_config_missing_model() {
        let test_env_var = "ANTHROPIC_API_KEY_TEST_MODEL";
        unsafe {
            std::env::set_var(test_env_var, "test-key");
        }

        let mut config = Config::minimal_for_testing();
        config.llm.anthropic = Some(reqiq_config::AnthropicConfig {
            api_key_env: Some(test_env_var.to_string()),
            base_url: None,
            model: None,
        });

        let result = AnthropicBackend::new_from_config(&config);

        unsafe {
            std::env::remove_var(test_env_var);
        }

        match result {
            Err(LlmError::Misconfiguration(msg)) => {
                assert!(msg.contains("model"));
            }
            _ => panic!("Expected Misconfiguration error for missing model"),
        }
    }
}
