//! Model pricing table for cost estimation.
//!
//! Prices are USD per million tokens, split by input and output. Models not
//! present in the table fall back to the default entry.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Price of one model, USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPrice {
    pub input_per_mtok: f64,
    pub output_per_mtok: f64,
}

/// Per-model pricing with a default fallback entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingTable {
    /// Fallback price for models absent from `models`
    pub default: ModelPrice,
    /// Exact-name price entries
    #[serde(default)]
    pub models: HashMap<String, ModelPrice>,
}

impl PricingTable {
    /// Look up the price for a model, falling back to the default entry.
    #[must_use]
    pub fn price_for(&self, model: &str) -> ModelPrice {
        self.models.get(model).copied().unwrap_or(self.default)
    }
}

impl Default for PricingTable {
    fn default() -> Self {
        let mut models = HashMap::new();
        models.insert(
            "claude-sonnet-4-5".to_string(),
            ModelPrice {
                input_per_mtok: 3.0,
                output_per_mtok: 15.0,
            },
        );
        models.insert(
            "claude-haiku-4-5".to_string(),
            ModelPrice {
                input_per_mtok: 1.0,
                output_per_mtok: 5.0,
            },
        );
        models.insert(
            "llama-3.3-70b-versatile".to_string(),
            ModelPrice {
                input_per_mtok: 0.59,
                output_per_mtok: 0.79,
            },
        );

        Self {
            default: ModelPrice {
                input_per_mtok: 3.0,
                output_per_mtok: 15.0,
            },
            models,
        }
    }
}
