//! OpenRouter HTTP backend implementation
//!
//! HTTP-based backend for OpenRouter, which fronts many models through a
//! unified OpenAI-compatible chat-completions API. Also works against any
//! other OpenAI-compatible endpoint (Groq, Mistral) via `base_url`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::types::{LlmBackend, LlmCompletion, LlmInvocation, Message, Role};
use crate::LlmError;
use reqiq_config::Config;

/// Default OpenRouter API endpoint
const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default HTTP referer header value
const DEFAULT_REFERER: &str = "https://github.com/requirementiq/reqiq";

/// Default X-Title header value
const DEFAULT_TITLE: &str = "reqiq";

/// OpenRouter backend configuration
pub(crate) struct OpenRouterBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    default_model: String,
}

impl OpenRouterBackend {
    /// Create a new OpenRouter backend.
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

    /// Create a new OpenRouter backend from configuration.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the API key environment
    /// variable is not set or no model is configured.
    pub fn new_from_config(config: &Config) -> Result<Self, LlmError> {
        let api_key_env = config
            .llm
            .openrouter
            .as_ref()
            .and_then(|or| or.api_key_env.as_deref())
            .unwrap_or("OPENROUTER_API_KEY");

        let api_key = std::env::var(api_key_env).map_err(|_| {
            LlmError::Misconfiguration(format!(
                "OpenRouter API key not found in environment variable '{}'. \
                 Set this variable or configure a different api_key_env in [llm.openrouter].",
                api_key_env
            ))
        })?;

        let base_url = config
            .llm
            .openrouter
            .as_ref()
            .and_then(|or| or.base_url.clone());

        let default_model = config
            .llm
            .openrouter
            .as_ref()
            .and_then(|or| or.model.clone())
            .ok_or_else(|| {
                LlmError::Misconfiguration(
                    "OpenRouter model not specified in configuration. \
                     Set [llm.openrouter] model = \"model-name\"."
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

    /// Convert messages to OpenAI-compatible format
    fn convert_messages(messages: &[Message]) -> Vec<OpenAiMessage> {
        messages
            .iter()
            .map(|msg| OpenAiMessage {
                role: match msg.role {
                    Role::System => "system".to_string(),
                    Role::User => "user".to_string(),
                    Role::Assistant => "assistant".to_string(),
                },
                content: msg.content.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl LlmBackend for OpenRouterBackend {
    async fn invoke(&self, inv: LlmInvocation) -> Result<LlmCompletion, LlmError> {
        let model = self.resolve_model(&inv);

        debug!(
            provider = "openrouter",
            task_kind = %inv.task_kind,
            model = %model,
            max_tokens = inv.max_tokens,
            temperature = inv.temperature,
            timeout_secs = inv.timeout.as_secs(),
            "Invoking OpenRouter backend"
        );

        let request_body = OpenRouterRequest {
            model: model.clone(),
            messages: Self::convert_messages(&inv.messages),
            max_tokens: inv.max_tokens,
            temperature: inv.temperature,
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
            stream: false,
        };

        let started = Instant::now();
        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", DEFAULT_REFERER)
            .header("X-Title", DEFAULT_TITLE)
            .header("Content-Type", "application/json")
            .timeout(inv.timeout)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout {
                        duration: inv.timeout,
                    }
                } else {
                    LlmError::Unreachable(e.to_string())
                }
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(LlmError::RateLimited(format!(
                "OpenRouter returned HTTP 429 for model {model}"
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Unreachable(format!(
                "OpenRouter returned HTTP {status}: {body}"
            )));
        }

        let response_body: OpenRouterResponse = response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(format!("OpenRouter response: {e}")))?;
        let latency = started.elapsed();

        let choice = response_body.choices.first().ok_or_else(|| {
            LlmError::MalformedResponse("OpenRouter response missing choices[0]".to_string())
        })?;

        let content = choice.message.content.clone().ok_or_else(|| {
            LlmError::MalformedResponse(
                "OpenRouter response missing content in choices[0]".to_string(),
            )
        })?;

        let usage = response_body.usage.unwrap_or_default();

        debug!(
            provider = "openrouter",
            tokens_input = usage.prompt_tokens,
            tokens_output = usage.completion_tokens,
            latency_ms = latency.as_millis() as u64,
            "OpenRouter invocation completed"
        );

        Ok(LlmCompletion {
            raw_response: content,
            provider: "openrouter".to_string(),
            model_used: model,
            tokens_input: usage.prompt_tokens,
            tokens_output: usage.completion_tokens,
            latency,
        })
    }

    fn provider(&self) -> &str {
        "openrouter"
    }
}

/// OpenAI-compatible message format
#[derive(Debug, Clone, Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

/// Structured-output request hint
#[derive(Debug, Clone, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

/// OpenRouter request body
#[derive(Debug, Clone, Serialize)]
struct OpenRouterRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    max_tokens: u32,
    temperature: f32,
    response_format: ResponseFormat,
    stream: bool,
}

/// OpenRouter response body
#[derive(Debug, Clone, Deserialize)]
struct OpenRouterResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

/// A single completion choice
#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

/// Message inside a completion choice
#[derive(Debug, Clone, Deserialize)]
struct ChoiceMessage {
    #[allow(dead_code)] // Present in the wire format; only content is consumed
    role: Option<String>,
    content: Option<String>,
}

/// Token usage information (OpenAI naming)
#[derive(Debug, Clone, Default, Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn convert_messages_maps_roles() {
        let messages = vec![
            Message::system("You are an Agile delivery expert"),
            Message::user("Generate artifacts"),
        ];

        let converted = OpenRouterBackend::convert_messages(&messages);

        assert_eq!(converted.len(), 2);
        assert_eq!(converted[0].role, "system");
        assert_eq!(converted[1].role, "user");
    }

    #[test]
    fn resolve_model_prefers_invocation_model() {
        let backend = OpenRouterBackend::new(
            "test-key".to_string(),
            None,
            "default-model".to_string(),
        )
        .unwrap();

        let inv = LlmInvocation::new(
            "frd",
            "meta-llama/llama-3.3-70b",
            Duration::from_secs(45),
            vec![],
            2048,
            0.3,
        );
        assert_eq!(backend.resolve_model(&inv), "meta-llama/llama-3.3-70b");
    }

    #[test]
    fn new_from_config_missing_api_key() {
        let test_env_var = "OPENROUTER_API_KEY_TEST_MISSING";
        unsafe {
            std::env::remove_var(test_env_var);
        }

        let mut config = Config::minimal_for_testing();
        config.llm.openrouter = Some(reqiq_config::OpenRouterConfig {
            api_key_env: Some(test_env_var.to_string()),
            base_url: None,
            model: Some("test-model".to_string()),
        });

        match OpenRouterBackend::new_from_config(&config) {
            Err(LlmError::Misconfiguration(msg)) => {
                assert!(msg.contains(test_env_var));
            }
            _ => panic!("Expected Misconfiguration error for missing API key"),
        }
    }
}
