//! Per-domain guidance text spliced into generation prompts.

use crate::Domain;

const BFSI_CONTEXT: &str = "\
DOMAIN CONTEXT (Banking, Financial Services & Insurance):
- Flag regulatory touchpoints: KYC/AML checks, audit trails, data residency.
- Treat monetary amounts, interest calculations, and settlement cutoffs as \
requirements with explicit precision and rounding rules.
- Reconciliation, maker-checker approval, and transaction reversal flows are \
commonly implied even when stakeholders do not mention them.";

const HEALTHCARE_CONTEXT: &str = "\
DOMAIN CONTEXT (Healthcare):
- Patient data is protected health information; call out consent, access \
control, and audit logging requirements explicitly.
- Prefer standard vocabularies and interfaces (HL7/FHIR, ICD, CPT) when \
integrations are mentioned.
- Clinical safety workflows (escalation, overrides, downtime procedures) \
deserve explicit requirements.";

const SAAS_CONTEXT: &str = "\
DOMAIN CONTEXT (B2B SaaS):
- Assume multi-tenant isolation, role-based access, and per-plan feature \
gating unless stated otherwise.
- Billing lifecycle events (trial, upgrade, dunning, cancellation) and usage \
limits are common hidden requirements.
- Surface integration requirements: SSO/SAML, webhooks, public API limits.";

const GENERIC_CONTEXT: &str = "\
DOMAIN CONTEXT (General):
- Derive requirements only from the stakeholder input; do not assume an \
industry-specific regulation or workflow.
- Mark anything that cannot be determined from the input as INSUFFICIENT_DATA \
rather than inventing detail.";

/// Guidance text for a domain. Pure lookup; `Generic` (and therefore any
/// unrecognized input upstream) gets the generic fallback.
#[must_use]
pub fn context_for(domain: Domain) -> &'static str {
    match domain {
        Domain::Bfsi => BFSI_CONTEXT,
        Domain::Healthcare => HEALTHCARE_CONTEXT,
        Domain::Saas => SAAS_CONTEXT,
        Domain::Generic => GENERIC_CONTEXT,
    }
}
