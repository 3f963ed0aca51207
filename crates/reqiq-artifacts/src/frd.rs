//! Functional requirements document schema.

use serde::{Deserialize, Serialize};

use crate::shared::{Confidence, ConfidenceSection, MoscowPriority};

/// One numbered functional requirement (FR-001, FR-002, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrItem {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub priority: MoscowPriority,
    #[serde(default)]
    pub business_rule: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRequirement {
    pub entity: String,
    pub attributes: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorHandlingCase {
    pub scenario: String,
    pub expected_behavior: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationPoint {
    pub system: String,
    /// Integration style, e.g. "REST", "file", "event"
    #[serde(rename = "type")]
    pub integration_type: String,
    pub description: String,
}

/// Category of a numbered non-functional requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NfrCategory {
    Performance,
    Security,
    Scalability,
    Availability,
    Reliability,
    Usability,
}

/// One numbered non-functional requirement (NFR-001, NFR-002, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NfrItem {
    pub id: String,
    pub category: NfrCategory,
    pub requirement: String,
    #[serde(default)]
    pub metric: Option<String>,
}

/// A complete functional requirements document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrdDocument {
    pub system_overview: ConfidenceSection,
    pub functional_requirements: Vec<FrItem>,
    pub data_requirements: Vec<DataRequirement>,
    pub error_handling: Vec<ErrorHandlingCase>,
    pub integration_points: Vec<IntegrationPoint>,
    pub non_functional_requirements: Vec<NfrItem>,
    #[serde(default)]
    pub overall_confidence: Confidence,
}

impl FrdDocument {
    /// Semantic contract rules on top of the schema shape.
    ///
    /// # Errors
    /// Returns a human-readable rule description on the first violation.
    pub(crate) fn check_rules(&self) -> Result<(), String> {
        for item in &self.functional_requirements {
            if item.id.trim().is_empty() {
                return Err("functional requirement id must not be empty".to_string());
            }
        }
        for item in &self.non_functional_requirements {
            if item.id.trim().is_empty() {
                return Err("non-functional requirement id must not be empty".to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_frd_json() -> serde_json::Value {
        serde_json::json!({
            "system_overview": {"content": "Overview"},
            "functional_requirements": [
                {"id": "FR-001", "title": "T", "description": "D"}
            ],
            "data_requirements": [],
            "error_handling": [],
            "integration_points": [
                {"system": "Billing", "type": "REST", "description": "Balance lookup"}
            ],
            "non_functional_requirements": [
                {"id": "NFR-001", "category": "Performance", "requirement": "Fast"}
            ]
        })
    }

    #[test]
    fn minimal_document_deserializes_with_defaults() {
        let doc: FrdDocument = serde_json::from_value(minimal_frd_json()).unwrap();
        assert_eq!(doc.functional_requirements[0].priority, MoscowPriority::Should);
        assert!(doc.functional_requirements[0].business_rule.is_none());
        assert_eq!(doc.overall_confidence, Confidence::Medium);
        assert!(doc.check_rules().is_ok());
    }

    #[test]
    fn unknown_nfr_category_is_a_schema_error() {
        let mut value = minimal_frd_json();
        value["non_functional_requirements"][0]["category"] = "Maintainability".into();
        assert!(serde_json::from_value::<FrdDocument>(value).is_err());
    }

    #[test]
    fn integration_type_round_trips_through_rename() {
        let doc: FrdDocument = serde_json::from_value(minimal_frd_json()).unwrap();
        let back = serde_json::to_value(&doc).unwrap();
        assert_eq!(back["integration_points"][0]["type"], "REST");
    }
}
