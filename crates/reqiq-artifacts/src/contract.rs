//! Structured-output contract validation.
//!
//! Turns a raw completion into a typed [`Artifact`] or a retryable
//! [`ContractViolation`]. Validation is pure and synchronous; it never
//! touches the network.

use serde::de::DeserializeOwned;

use crate::agile::AgileBacklog;
use crate::artifact::Artifact;
use crate::brd::BrdDocument;
use crate::frd::FrdDocument;
use crate::gap::GapReport;
use crate::kind::ArtifactKind;
use crate::risk::RiskRegister;
use reqiq_utils::error::ContractViolation;

/// Parse and contract-check a raw completion for the given kind.
///
/// Providers occasionally wrap JSON in a markdown code fence despite
/// JSON-mode instructions; fences are stripped before parsing.
///
/// # Errors
///
/// - [`ContractViolation::NotJson`] when the body is not JSON at all
/// - [`ContractViolation::SchemaMismatch`] when JSON does not fit the
///   kind's schema
/// - [`ContractViolation::RuleBroken`] when the value parses but breaks a
///   semantic rule (non-Fibonacci points, empty ids, ...)
pub fn parse_artifact(kind: ArtifactKind, raw: &str) -> Result<Artifact, ContractViolation> {
    let body = strip_code_fence(raw);

    match kind {
        ArtifactKind::Brd => {
            let doc: BrdDocument = parse_payload(kind, body)?;
            check(kind, doc.check_rules())?;
            Ok(Artifact::Brd(doc))
        }
        ArtifactKind::Frd => {
            let doc: FrdDocument = parse_payload(kind, body)?;
            check(kind, doc.check_rules())?;
            Ok(Artifact::Frd(doc))
        }
        ArtifactKind::Agile => {
            let backlog: AgileBacklog = parse_payload(kind, body)?;
            check(kind, backlog.check_rules())?;
            Ok(Artifact::Agile(backlog))
        }
        ArtifactKind::Gap => {
            let report: GapReport = parse_payload(kind, body)?;
            check(kind, report.check_rules())?;
            Ok(Artifact::Gap(report))
        }
        ArtifactKind::Risk => {
            let register: RiskRegister = parse_payload(kind, body)?;
            check(kind, register.check_rules())?;
            Ok(Artifact::Risk(register))
        }
    }
}

fn parse_payload<T: DeserializeOwned>(
    kind: ArtifactKind,
    body: &str,
) -> Result<T, ContractViolation> {
    // Distinguish "not JSON" from "JSON of the wrong shape": the former gets
    // a syntax diagnostic, the latter the schema path that failed.
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ContractViolation::NotJson(e.to_string()))?;

    serde_json::from_value(value).map_err(|e| ContractViolation::SchemaMismatch {
        kind: kind.as_str().to_string(),
        detail: e.to_string(),
    })
}

fn check(kind: ArtifactKind, result: Result<(), String>) -> Result<(), ContractViolation> {
    result.map_err(|detail| ContractViolation::RuleBroken {
        kind: kind.as_str().to_string(),
        detail,
    })
}

/// Strip a single surrounding markdown code fence (```json ... ``` or
/// ``` ... ```) if present. Anything else passes through trimmed.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(rest) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening fence line
    match rest.split_once('\n') {
        Some((_, body)) => body.trim(),
        None => rest.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_GAP: &str = r#"{"gaps": [{"type": "missing_stakeholders",
        "severity": "HIGH", "description": "Ops team absent",
        "recommendation": "Interview operations"}]}"#;

    #[test]
    fn valid_gap_report_parses() {
        let artifact = parse_artifact(ArtifactKind::Gap, VALID_GAP).unwrap();
        assert_eq!(artifact.kind(), ArtifactKind::Gap);
    }

    #[test]
    fn fenced_json_is_unwrapped() {
        let fenced = format!("```json\n{VALID_GAP}\n```");
        let artifact = parse_artifact(ArtifactKind::Gap, &fenced).unwrap();
        assert_eq!(artifact.kind(), ArtifactKind::Gap);
    }

    #[test]
    fn bare_fence_is_unwrapped() {
        let fenced = format!("```\n{VALID_GAP}\n```");
        assert!(parse_artifact(ArtifactKind::Gap, &fenced).is_ok());
    }

    #[test]
    fn prose_is_not_json() {
        match parse_artifact(ArtifactKind::Gap, "Here is your gap analysis.") {
            Err(ContractViolation::NotJson(_)) => {}
            other => panic!("expected NotJson, got {other:?}"),
        }
    }

    #[test]
    fn wrong_shape_is_schema_mismatch() {
        match parse_artifact(ArtifactKind::Gap, r#"{"holes": []}"#) {
            Err(ContractViolation::SchemaMismatch { kind, .. }) => assert_eq!(kind, "gap"),
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
    }

    #[test]
    fn broken_rule_is_reported_with_detail() {
        let raw = r#"{"risks": [{"id": "", "category": "delivery",
            "description": "d", "likelihood": "LOW", "impact": "LOW",
            "mitigation": "m"}]}"#;
        match parse_artifact(ArtifactKind::Risk, raw) {
            Err(ContractViolation::RuleBroken { detail, .. }) => {
                assert!(detail.contains("risk id"));
            }
            other => panic!("expected RuleBroken, got {other:?}"),
        }
    }

    #[test]
    fn kind_and_payload_must_agree() {
        // A valid gap body presented as a risk register is a mismatch
        match parse_artifact(ArtifactKind::Risk, VALID_GAP) {
            Err(ContractViolation::SchemaMismatch { kind, .. }) => assert_eq!(kind, "risk"),
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
    }
}
