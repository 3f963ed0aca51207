//! Risk register schema.

use serde::{Deserialize, Serialize};

use crate::shared::Severity;

/// One register entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskEntry {
    pub id: String,
    /// Free-form grouping, e.g. "integration", "compliance", "delivery"
    pub category: String,
    pub description: String,
    pub likelihood: Severity,
    pub impact: Severity,
    pub mitigation: String,
}

impl RiskEntry {
    /// Combined exposure grade: the worse of likelihood and impact.
    #[must_use]
    pub fn exposure(&self) -> Severity {
        self.likelihood.max(self.impact)
    }
}

/// A complete risk register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskRegister {
    pub risks: Vec<RiskEntry>,
}

impl RiskRegister {
    /// Semantic contract rules on top of the schema shape.
    ///
    /// # Errors
    /// Returns a human-readable rule description on the first violation.
    pub(crate) fn check_rules(&self) -> Result<(), String> {
        for risk in &self.risks {
            if risk.id.trim().is_empty() {
                return Err("risk id must not be empty".to_string());
            }
            if risk.mitigation.trim().is_empty() {
                return Err(format!("risk {} has an empty mitigation", risk.id));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(likelihood: &str, impact: &str) -> RiskEntry {
        serde_json::from_value(serde_json::json!({
            "id": "RISK-001",
            "category": "integration",
            "description": "Contract drift",
            "likelihood": likelihood,
            "impact": impact,
            "mitigation": "Freeze the contract"
        }))
        .unwrap()
    }

    #[test]
    fn exposure_takes_the_worse_grade() {
        assert_eq!(entry("LOW", "HIGH").exposure(), Severity::High);
        assert_eq!(entry("MEDIUM", "LOW").exposure(), Severity::Medium);
    }

    #[test]
    fn empty_mitigation_breaks_the_contract() {
        let register = RiskRegister {
            risks: vec![RiskEntry {
                mitigation: " ".to_string(),
                ..entry("LOW", "LOW")
            }],
        };
        let err = register.check_rules().unwrap_err();
        assert!(err.contains("RISK-001"));
    }
}
