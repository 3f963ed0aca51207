//! Value types shared by several artifact schemas.

use serde::{Deserialize, Serialize};

/// Confidence grade attached to generated sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    #[default]
    Medium,
    Low,
}

/// HIGH/MEDIUM/LOW grading used for gap severity and risk likelihood/impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A free-text section with a confidence grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceSection {
    pub content: String,
    #[serde(default)]
    pub confidence: Confidence,
}

/// MoSCoW prioritization used by FRD items and user stories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoscowPriority {
    Must,
    #[default]
    Should,
    Could,
    #[serde(rename = "Won't")]
    Wont,
}

/// High/Medium/Low prioritization used by BRD requirement lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TierPriority {
    High,
    Medium,
    Low,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_defaults_to_medium() {
        let section: ConfidenceSection = serde_json::from_str(r#"{"content": "x"}"#).unwrap();
        assert_eq!(section.confidence, Confidence::Medium);
    }

    #[test]
    fn severity_parses_uppercase_only() {
        assert!(serde_json::from_str::<Severity>(r#""HIGH""#).is_ok());
        assert!(serde_json::from_str::<Severity>(r#""high""#).is_err());
    }

    #[test]
    fn severity_orders_by_grade() {
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn moscow_wont_uses_apostrophe_form() {
        let parsed: MoscowPriority = serde_json::from_str(r#""Won't""#).unwrap();
        assert_eq!(parsed, MoscowPriority::Wont);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), r#""Won't""#);
    }
}
