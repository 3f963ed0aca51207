//! Requirements gap report schema.

use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::shared::Severity;

/// The seven audited gap categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum GapCategory {
    MissingStakeholders,
    UndefinedScopeBoundaries,
    MissingPerformanceCriteria,
    MissingSecurityRequirements,
    MissingEdgeCases,
    MissingAdminRoles,
    MissingDataRetentionPolicy,
}

/// One detected gap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gap {
    #[serde(rename = "type")]
    pub category: GapCategory,
    pub severity: Severity,
    pub description: String,
    pub recommendation: String,
}

/// A complete gap report. Categories without findings are simply absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapReport {
    pub gaps: Vec<Gap>,
}

impl GapReport {
    /// Semantic contract rules on top of the schema shape.
    ///
    /// # Errors
    /// Returns a human-readable rule description on the first violation.
    pub(crate) fn check_rules(&self) -> Result<(), String> {
        for gap in &self.gaps {
            if gap.description.trim().is_empty() {
                return Err("gap description must not be empty".to_string());
            }
            if gap.recommendation.trim().is_empty() {
                return Err("gap recommendation must not be empty".to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_with_known_category_parses() {
        let report: GapReport = serde_json::from_str(
            r#"{"gaps": [{"type": "missing_edge_cases", "severity": "HIGH",
                 "description": "No failure flows", "recommendation": "Define them"}]}"#,
        )
        .unwrap();
        assert_eq!(report.gaps[0].category, GapCategory::MissingEdgeCases);
        assert!(report.check_rules().is_ok());
    }

    #[test]
    fn unknown_category_is_a_schema_error() {
        let result = serde_json::from_str::<GapReport>(
            r#"{"gaps": [{"type": "missing_budget", "severity": "LOW",
                 "description": "d", "recommendation": "r"}]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn empty_recommendation_breaks_the_contract() {
        let report: GapReport = serde_json::from_str(
            r#"{"gaps": [{"type": "missing_admin_roles", "severity": "LOW",
                 "description": "d", "recommendation": "  "}]}"#,
        )
        .unwrap();
        assert!(report.check_rules().is_err());
    }

    #[test]
    fn empty_gap_list_is_valid() {
        let report: GapReport = serde_json::from_str(r#"{"gaps": []}"#).unwrap();
        assert!(report.check_rules().is_ok());
    }
}
