//! Prompt construction per artifact kind.
//!
//! Each kind gets a system prompt embedding its JSON schema and output rules
//! plus a user prompt carrying the (capped) stakeholder input. Dependent
//! kinds see the independent-stage digest instead of full artifacts. From
//! the second attempt onward a corrective instruction carrying the previous
//! validation diagnostic is appended to the user prompt.

use reqiq_domain::{context_for, Domain};
use reqiq_utils::text::{truncate_chars, truncate_diagnostic};

use crate::kind::ArtifactKind;

/// Input caps applied at prompt build, chars. Large documents get capped
/// hard; dependent kinds see only short summaries.
const BRD_INPUT_CAP: usize = 15_000;
const FRD_INPUT_CAP: usize = 15_000;
const AGILE_INPUT_CAP: usize = 12_000;
const DEPENDENT_SUMMARY_CAP: usize = 3_000;

/// Everything a prompt can draw on.
#[derive(Debug, Clone, Copy)]
pub struct PromptInputs<'a> {
    /// Resolved industry domain
    pub domain: Domain,
    /// Raw stakeholder input text (caller-truncated upstream)
    pub input_text: &'a str,
    /// Digest of the independent stage; only dependent kinds read this
    pub digest: &'a str,
}

/// A rendered (system, user) prompt pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    pub system: String,
    pub user: String,
}

/// Build the prompt pair for one attempt.
///
/// `corrective` is the prior attempt's validation diagnostic; when present
/// it is truncated and appended as a corrective instruction.
#[must_use]
pub fn build_prompts(
    kind: ArtifactKind,
    inputs: PromptInputs<'_>,
    corrective: Option<&str>,
) -> PromptSet {
    let system = match kind {
        ArtifactKind::Brd => brd_system(inputs.domain),
        ArtifactKind::Frd => frd_system(inputs.domain),
        ArtifactKind::Agile => agile_system(inputs.domain),
        ArtifactKind::Gap => GAP_SYSTEM.to_string(),
        ArtifactKind::Risk => RISK_SYSTEM.to_string(),
    };

    let mut user = match kind {
        ArtifactKind::Brd => independent_user(
            "Analyze the following stakeholder input and generate the BRD JSON:",
            truncate_chars(inputs.input_text, BRD_INPUT_CAP),
        ),
        ArtifactKind::Frd => independent_user(
            "Analyze the following input and generate the FRD JSON:",
            truncate_chars(inputs.input_text, FRD_INPUT_CAP),
        ),
        ArtifactKind::Agile => independent_user(
            "Analyze the following input and generate Agile artifacts JSON:",
            truncate_chars(inputs.input_text, AGILE_INPUT_CAP),
        ),
        ArtifactKind::Gap | ArtifactKind::Risk => dependent_user(
            truncate_chars(inputs.input_text, DEPENDENT_SUMMARY_CAP),
            truncate_chars(inputs.digest, DEPENDENT_SUMMARY_CAP),
        ),
    };

    if let Some(diagnostic) = corrective {
        user.push_str(&format!(
            "\n\nCRITICAL: Previous response had schema errors: {}. \
             Return ONLY valid JSON matching the schema exactly.",
            truncate_diagnostic(diagnostic)
        ));
    }

    PromptSet { system, user }
}

fn independent_user(instruction: &str, input: &str) -> String {
    format!("{instruction}\n---\n{input}\n---")
}

fn dependent_user(raw_summary: &str, digest: &str) -> String {
    format!(
        "ORIGINAL INPUT SUMMARY:\n{raw_summary}\n\n\
         GENERATED DOCUMENT SUMMARY:\n{digest}\n\n\
         Identify all findings and return JSON:"
    )
}

fn brd_system(domain: Domain) -> String {
    format!(
        "You are a senior Business Analyst with 15+ years of experience in {domain}.\n\
         Analyze the stakeholder input provided and generate a complete Business \
         Requirements Document (BRD) strictly following the exact Enterprise format requested.\n\n\
         {context}\n\n\
         OUTPUT RULES:\n\
         - Respond ONLY with valid JSON matching the schema below. No markdown, no explanations.\n\
         - If a section cannot be determined from the input, use \"INSUFFICIENT_DATA\" as the value.\n\
         - Never invent stakeholder names, metrics, or technical specifications not present in the input.\n\
         - Mark fields with low confidence using \"confidence\": \"low\".\n\n\
         JSON SCHEMA:\n{schema}",
        domain = domain,
        context = context_for(domain),
        schema = BRD_SCHEMA,
    )
}

fn frd_system(domain: Domain) -> String {
    format!(
        "You are a senior Business Analyst creating a Functional Requirements Document (FRD).\n\
         Analyze the input and generate a complete, numbered FRD.\n\n\
         {context}\n\n\
         OUTPUT RULES:\n\
         - Respond ONLY with valid JSON matching the schema below.\n\
         - Use \"INSUFFICIENT_DATA\" if a section cannot be determined.\n\
         - Number functional requirements as FR-001, FR-002, etc.\n\
         - Number non-functional requirements as NFR-001, NFR-002, etc.\n\n\
         JSON SCHEMA:\n{schema}",
        context = context_for(domain),
        schema = FRD_SCHEMA,
    )
}

fn agile_system(domain: Domain) -> String {
    format!(
        "You are an Agile delivery expert. Analyze the stakeholder input and generate Agile artifacts.\n\n\
         {context}\n\n\
         OUTPUT RULES:\n\
         - Respond ONLY with valid JSON matching the schema below.\n\
         - Acceptance Criteria MUST use Gherkin format: Given / When / Then\n\
         - Story Points use Fibonacci: 1, 2, 3, 5, 8, 13 (estimate complexity, not time)\n\
         - User story format: \"As a [role], I want to [action] so that [benefit]\"\n\n\
         JSON SCHEMA:\n{schema}",
        context = context_for(domain),
        schema = AGILE_SCHEMA,
    )
}

const BRD_SCHEMA: &str = r#"{
  "project_name": "string",
  "document_control": {"version": "string", "prepared_by": "string", "reviewed_by": "string", "approved_by": "string", "date": "string", "status": "Draft | Review | Final"},
  "executive_summary": {"content": "string", "confidence": "high|medium|low"},
  "business_objectives": ["string"],
  "success_criteria": ["string"],
  "problem_statement": {"content": "string", "confidence": "high|medium|low"},
  "scope_in": ["string"],
  "scope_out": ["string"],
  "stakeholders": [{"name": "string", "role": "string", "responsibility": "string"}],
  "business_requirements": [{"id": "string", "description": "string", "priority": "High|Medium|Low"}],
  "functional_requirements": [{"id": "string", "description": "string", "priority": "High|Medium|Low"}],
  "non_functional_requirements": {"performance": "string", "security": "string", "scalability": "string", "availability": "string", "usability": "string"},
  "assumptions": ["string"],
  "constraints": ["string"],
  "dependencies": ["string"],
  "risks": [{"id": "string", "description": "string", "impact": "High|Medium|Low", "mitigation": "string"}],
  "acceptance_criteria": ["string"],
  "timeline_milestones": [{"phase": "string", "description": "string", "target_date": "string"}],
  "overall_confidence": "high|medium|low"
}"#;

const FRD_SCHEMA: &str = r#"{
  "system_overview": {"content": "string", "confidence": "high|medium|low"},
  "functional_requirements": [
    {"id": "FR-001", "title": "string", "description": "string",
      "priority": "Must|Should|Could|Won't", "business_rule": "string|null"}
  ],
  "data_requirements": [{"entity": "string", "attributes": ["string"], "notes": "string"}],
  "error_handling": [{"scenario": "string", "expected_behavior": "string"}],
  "integration_points": [{"system": "string", "type": "string", "description": "string"}],
  "non_functional_requirements": [
    {"id": "NFR-001", "category": "Performance|Security|Scalability|Availability|Reliability|Usability",
      "requirement": "string", "metric": "string|null"}
  ],
  "overall_confidence": "high|medium|low"
}"#;

const AGILE_SCHEMA: &str = r#"{
  "epics": [
    {
      "id": "EP-001",
      "title": "string",
      "description": "string",
      "stories": [
        {
          "id": "US-001",
          "title": "string",
          "story": "As a [role], I want to [action] so that [benefit]",
          "story_points": 3,
          "priority": "Must|Should|Could|Won't",
          "acceptance_criteria": [
            {"given": "string", "when": "string", "then": "string"}
          ]
        }
      ]
    }
  ],
  "overall_confidence": "high|medium|low"
}"#;

const GAP_SYSTEM: &str = r#"You are a requirements completeness auditor.
Analyze the original stakeholder input AND the generated document summary.
Identify missing or under-specified requirements across these 7 gap categories:

1. missing_stakeholders — Key people or teams not mentioned
2. undefined_scope_boundaries — What is in/out of scope is unclear
3. missing_performance_criteria — No SLAs, response times, or throughput defined
4. missing_security_requirements — Auth, authorization, encryption not specified
5. missing_edge_cases — Failure scenarios, boundary conditions not covered
6. missing_admin_roles — Admin/superuser workflows or back-office not defined
7. missing_data_retention_policy — Data storage duration, archival, deletion not mentioned

OUTPUT RULES:
- Respond ONLY with valid JSON matching the schema below.
- If no gaps in a category, omit it from results.
- Be specific and actionable in recommendations.

JSON SCHEMA:
{
  "gaps": [
    {
      "type": "one of the 7 categories above",
      "severity": "HIGH|MEDIUM|LOW",
      "description": "What is missing and why it matters",
      "recommendation": "Specific action to resolve this gap"
    }
  ]
}"#;

const RISK_SYSTEM: &str = r#"You are a delivery risk analyst.
Analyze the original stakeholder input AND the generated document summary.
Identify delivery, integration, compliance, and adoption risks that would
threaten this initiative.

OUTPUT RULES:
- Respond ONLY with valid JSON matching the schema below.
- Number risks as RISK-001, RISK-002, etc.
- Likelihood and impact are independent gradings; do not conflate them.
- Every risk needs a concrete, actionable mitigation.

JSON SCHEMA:
{
  "risks": [
    {
      "id": "RISK-001",
      "category": "string",
      "description": "What could go wrong and why",
      "likelihood": "HIGH|MEDIUM|LOW",
      "impact": "HIGH|MEDIUM|LOW",
      "mitigation": "Specific action to reduce likelihood or impact"
    }
  ]
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(text: &str) -> PromptInputs<'_> {
        PromptInputs {
            domain: Domain::Saas,
            input_text: text,
            digest: "brd: 2 business requirements | frd: 1 functional requirements",
        }
    }

    #[test]
    fn independent_prompt_carries_input_and_schema() {
        let set = build_prompts(ArtifactKind::Brd, inputs("Build a portal"), None);
        assert!(set.system.contains("JSON SCHEMA"));
        assert!(set.system.contains("DOMAIN CONTEXT"));
        assert!(set.user.contains("Build a portal"));
    }

    #[test]
    fn dependent_prompt_uses_digest_not_input_schema() {
        let set = build_prompts(ArtifactKind::Gap, inputs("Build a portal"), None);
        assert!(set.user.contains("GENERATED DOCUMENT SUMMARY"));
        assert!(set.user.contains("brd: 2 business requirements"));
        assert!(set.system.contains("7 gap categories"));
    }

    #[test]
    fn corrective_instruction_is_appended_and_truncated() {
        let long_diag = "y".repeat(500);
        let set = build_prompts(ArtifactKind::Frd, inputs("text"), Some(&long_diag));
        assert!(set.user.contains("CRITICAL: Previous response had schema errors"));
        // 200-char cap on the diagnostic portion
        assert!(!set.user.contains(&"y".repeat(201)));
        assert!(set.user.contains(&"y".repeat(200)));
    }

    #[test]
    fn first_attempt_has_no_corrective_instruction() {
        let set = build_prompts(ArtifactKind::Agile, inputs("text"), None);
        assert!(!set.user.contains("CRITICAL"));
    }

    #[test]
    fn oversized_input_is_capped() {
        let huge = "z".repeat(20_000);
        let set = build_prompts(ArtifactKind::Agile, inputs(&huge), None);
        // Agile cap is 12k chars of input plus fixed framing
        assert!(set.user.len() < 13_000);
    }

    #[test]
    fn risk_prompt_numbers_risks() {
        let set = build_prompts(ArtifactKind::Risk, inputs("text"), None);
        assert!(set.system.contains("RISK-001"));
    }
}
