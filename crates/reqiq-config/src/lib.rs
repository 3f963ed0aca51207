//! Configuration management for reqiq
//!
//! Hierarchical configuration with discovery and precedence: CLI flags >
//! config file > built-in defaults. Supports TOML configuration files with
//! `[pipeline]`, `[llm]`, and `[pricing]` sections, discovered by walking
//! upward from the working directory (`.reqiq/config.toml`) or taken from
//! `REQIQ_HOME` when set.

mod config;
mod pricing;

pub use config::{
    AnthropicConfig, Config, LlmConfig, OpenRouterConfig, PipelineConfig, CONFIG_DIR_NAME,
    CONFIG_FILE_NAME,
};
pub use pricing::{ModelPrice, PricingTable};
