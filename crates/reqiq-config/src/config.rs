//! Configuration model, discovery, and validation.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::pricing::PricingTable;
use reqiq_utils::error::ConfigError;

/// Directory that holds the config file, searched upward from the cwd.
pub const CONFIG_DIR_NAME: &str = ".reqiq";

/// Config file name inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable overriding discovery with an explicit home directory.
const HOME_ENV: &str = "REQIQ_HOME";

/// Pipeline execution settings.
///
/// Defaults mirror the original service tuning: two validation retries,
/// 45 second per-call timeout, temperature 0.3, 3500 output tokens, and a
/// three-worker pool for the independent stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Validation retries per task; attempts = max_retries + 1
    pub max_retries: u32,
    /// Per-call timeout in seconds (transport-level, not run-level)
    pub call_timeout_secs: u64,
    /// Sampling temperature for generation calls
    pub temperature: f32,
    /// Output token cap per call
    pub max_output_tokens: u32,
    /// Concurrent workers for the independent stage
    pub workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            call_timeout_secs: 45,
            temperature: 0.3,
            max_output_tokens: 3500,
            workers: 3,
        }
    }
}

/// LLM provider selection plus per-provider tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name: "anthropic", "openrouter", or "fixture"
    pub provider: Option<String>,
    pub anthropic: Option<AnthropicConfig>,
    pub openrouter: Option<OpenRouterConfig>,
}

/// Anthropic HTTP provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

/// OpenRouter HTTP provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRouterConfig {
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

/// Raw TOML shape: every section optional so partial files merge cleanly
/// over the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
struct TomlConfig {
    pipeline: Option<TomlPipeline>,
    llm: Option<LlmConfig>,
    pricing: Option<PricingTable>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TomlPipeline {
    max_retries: Option<u32>,
    call_timeout_secs: Option<u64>,
    temperature: Option<f32>,
    max_output_tokens: Option<u32>,
    workers: Option<usize>,
}

/// Configuration for reqiq operations.
///
/// Use [`Config::discover`] for CLI-like behavior (upward search honoring
/// `REQIQ_HOME`), [`Config::load_from`] for an explicit file, or
/// [`Config::minimal_for_testing`] in tests.
#[derive(Debug, Clone)]
pub struct Config {
    pub pipeline: PipelineConfig,
    pub llm: LlmConfig,
    pub pricing: PricingTable,
}

impl Config {
    /// Discover and load configuration starting from the current directory.
    ///
    /// # Errors
    /// Returns `ConfigError` if a discovered file cannot be read or parsed,
    /// or if a loaded value fails validation. A missing file is not an
    /// error; defaults apply.
    pub fn discover() -> Result<Self, ConfigError> {
        let start = env::current_dir().map_err(|e| ConfigError::Io {
            path: ".".to_string(),
            source: e,
        })?;
        Self::discover_from(&start)
    }

    /// Path-driven discovery variant used by tests to avoid process-global
    /// state. Walks upward looking for `.reqiq/config.toml`, stopping at
    /// repository root markers (.git) or the filesystem root. `REQIQ_HOME`
    /// short-circuits the walk.
    pub fn discover_from(start_dir: &Path) -> Result<Self, ConfigError> {
        if let Ok(home) = env::var(HOME_ENV) {
            let path = Path::new(&home).join(CONFIG_FILE_NAME);
            return Self::load_from(&path);
        }

        match Self::find_config_file(start_dir) {
            Some(path) => Self::load_from(&path),
            None => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Load configuration from an explicit TOML file, merging over defaults.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read (other than not
    /// existing), fails to parse, or fails validation.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(content) => {
                toml::from_str::<TomlConfig>(&content).map_err(|e| ConfigError::InvalidFile {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => TomlConfig::default(),
            Err(e) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source: e,
                });
            }
        };

        let config = Self::from_toml(raw);
        config.validate()?;
        Ok(config)
    }

    /// Minimal configuration for tests: defaults plus the fixture provider,
    /// so nothing reaches the network.
    #[must_use]
    pub fn minimal_for_testing() -> Self {
        let mut config = Self::default();
        config.llm.provider = Some("fixture".to_string());
        config
    }

    fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
        let mut current = start_dir.to_path_buf();

        loop {
            let candidate = current.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
            if candidate.exists() {
                return Some(candidate);
            }

            if current.join(".git").exists() {
                return None;
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return None,
            }
        }
    }

    fn from_toml(raw: TomlConfig) -> Self {
        let mut pipeline = PipelineConfig::default();
        if let Some(p) = raw.pipeline {
            if let Some(v) = p.max_retries {
                pipeline.max_retries = v;
            }
            if let Some(v) = p.call_timeout_secs {
                pipeline.call_timeout_secs = v;
            }
            if let Some(v) = p.temperature {
                pipeline.temperature = v;
            }
            if let Some(v) = p.max_output_tokens {
                pipeline.max_output_tokens = v;
            }
            if let Some(v) = p.workers {
                pipeline.workers = v;
            }
        }

        Self {
            pipeline,
            llm: raw.llm.unwrap_or_default(),
            pricing: raw.pricing.unwrap_or_default(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline.workers == 0 {
            return Err(ConfigError::InvalidValue {
                key: "pipeline.workers".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.pipeline.call_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "pipeline.call_timeout_secs".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if !(0.0..=2.0).contains(&self.pipeline.temperature) {
            return Err(ConfigError::InvalidValue {
                key: "pipeline.temperature".to_string(),
                reason: format!("{} is outside 0.0..=2.0", self.pipeline.temperature),
            });
        }
        if self.pipeline.max_output_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                key: "pipeline.max_output_tokens".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            llm: LlmConfig::default(),
            pricing: PricingTable::default(),
        }
    }
}
