//! Business requirements document schema.

use serde::{Deserialize, Serialize};

use crate::shared::{Confidence, ConfidenceSection, TierPriority};

/// Document control block (version, sign-off trail). All fields optional:
/// stakeholder input rarely carries this and the generator fills what it can.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentControl {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub prepared_by: Option<String>,
    #[serde(default)]
    pub reviewed_by: Option<String>,
    #[serde(default)]
    pub approved_by: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stakeholder {
    pub name: String,
    pub role: String,
    pub responsibility: String,
}

/// One business or functional requirement row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrdRequirement {
    pub id: String,
    pub description: String,
    pub priority: TierPriority,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrdRisk {
    pub id: String,
    pub description: String,
    pub impact: TierPriority,
    pub mitigation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub phase: String,
    pub description: String,
    pub target_date: String,
}

/// Narrative non-functional requirements block. Sections the generator could
/// not determine arrive as `INSUFFICIENT_DATA` or are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NfrNarrative {
    #[serde(default)]
    pub performance: Option<String>,
    #[serde(default)]
    pub security: Option<String>,
    #[serde(default)]
    pub scalability: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub usability: Option<String>,
}

/// A complete business requirements document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrdDocument {
    pub project_name: String,
    #[serde(default)]
    pub document_control: DocumentControl,
    pub executive_summary: ConfidenceSection,
    pub business_objectives: Vec<String>,
    pub success_criteria: Vec<String>,
    pub problem_statement: ConfidenceSection,
    pub scope_in: Vec<String>,
    pub scope_out: Vec<String>,
    pub stakeholders: Vec<Stakeholder>,
    pub business_requirements: Vec<BrdRequirement>,
    pub functional_requirements: Vec<BrdRequirement>,
    #[serde(default)]
    pub non_functional_requirements: NfrNarrative,
    pub assumptions: Vec<String>,
    pub constraints: Vec<String>,
    pub dependencies: Vec<String>,
    pub risks: Vec<BrdRisk>,
    pub acceptance_criteria: Vec<String>,
    pub timeline_milestones: Vec<Milestone>,
    #[serde(default)]
    pub overall_confidence: Confidence,
}

impl BrdDocument {
    /// Semantic contract rules on top of the schema shape.
    ///
    /// # Errors
    /// Returns a human-readable rule description on the first violation.
    pub(crate) fn check_rules(&self) -> Result<(), String> {
        if self.project_name.trim().is_empty() {
            return Err("project_name must not be empty".to_string());
        }
        for req in self
            .business_requirements
            .iter()
            .chain(self.functional_requirements.iter())
        {
            if req.id.trim().is_empty() {
                return Err("requirement id must not be empty".to_string());
            }
        }
        for risk in &self.risks {
            if risk.id.trim().is_empty() {
                return Err("risk id must not be empty".to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_brd_json() -> serde_json::Value {
        serde_json::json!({
            "project_name": "Portal",
            "executive_summary": {"content": "Summary"},
            "business_objectives": ["obj"],
            "success_criteria": ["crit"],
            "problem_statement": {"content": "Problem", "confidence": "low"},
            "scope_in": [],
            "scope_out": [],
            "stakeholders": [],
            "business_requirements": [
                {"id": "BR-001", "description": "desc", "priority": "High"}
            ],
            "functional_requirements": [],
            "assumptions": [],
            "constraints": [],
            "dependencies": [],
            "risks": [],
            "acceptance_criteria": [],
            "timeline_milestones": []
        })
    }

    #[test]
    fn minimal_document_deserializes_with_defaults() {
        let doc: BrdDocument = serde_json::from_value(minimal_brd_json()).unwrap();
        assert_eq!(doc.overall_confidence, Confidence::Medium);
        assert_eq!(doc.document_control, DocumentControl::default());
        assert!(doc.check_rules().is_ok());
    }

    #[test]
    fn missing_required_section_is_a_schema_error() {
        let mut value = minimal_brd_json();
        value.as_object_mut().unwrap().remove("business_objectives");
        assert!(serde_json::from_value::<BrdDocument>(value).is_err());
    }

    #[test]
    fn invalid_priority_is_a_schema_error() {
        let mut value = minimal_brd_json();
        value["business_requirements"][0]["priority"] = "Urgent".into();
        assert!(serde_json::from_value::<BrdDocument>(value).is_err());
    }

    #[test]
    fn empty_requirement_id_breaks_the_contract() {
        let mut value = minimal_brd_json();
        value["business_requirements"][0]["id"] = "  ".into();
        let doc: BrdDocument = serde_json::from_value(value).unwrap();
        assert!(doc.check_rules().is_err());
    }
}
