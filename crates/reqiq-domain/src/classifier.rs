//! Keyword-based domain classifier.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::Domain;

/// Minimum keyword hits before a classification is trusted.
const MIN_HITS: usize = 2;

static DOMAIN_KEYWORDS: &[(Domain, &[&str])] = &[
    (
        Domain::Bfsi,
        &[
            "bank",
            "banking",
            "loan",
            "credit",
            "debit",
            "insurance",
            "premium",
            "policy",
            "investment",
            "portfolio",
            "kyc",
            "aml",
            "neft",
            "rtgs",
            "swift",
            "ifsc",
            "ledger",
            "reconciliation",
            "treasury",
            "forex",
            "mutual fund",
            "broker",
            "compliance",
            "rbi",
            "sebi",
            "irdai",
            "nbfc",
            "fintech",
            "payment gateway",
            "upi",
            "emi",
            "mortgage",
        ],
    ),
    (
        Domain::Healthcare,
        &[
            "patient",
            "hospital",
            "doctor",
            "clinic",
            "diagnosis",
            "treatment",
            "ehr",
            "emr",
            "prescription",
            "pharmacy",
            "medical",
            "health record",
            "hipaa",
            "hl7",
            "fhir",
            "radiology",
            "lab report",
            "appointment",
            "telemedicine",
            "nursing",
            "ward",
            "discharge",
            "icd",
            "cpt",
            "insurance claim",
            "prior authorization",
            "provider",
            "payer",
        ],
    ),
    (
        Domain::Saas,
        &[
            "subscription",
            "tenant",
            "multi-tenant",
            "api",
            "dashboard",
            "onboarding",
            "billing",
            "stripe",
            "plan",
            "free tier",
            "pro tier",
            "webhook",
            "integration",
            "oauth",
            "sso",
            "saml",
            "workspace",
            "organization",
            "seat",
            "usage limit",
            "rate limit",
            "sdk",
            "marketplace",
            "app store",
            "churn",
            "mrr",
            "arr",
            "saas",
        ],
    ),
];

/// One compiled word-boundary matcher per keyword, built on first use.
static MATCHERS: LazyLock<Vec<(Domain, Vec<Regex>)>> = LazyLock::new(|| {
    DOMAIN_KEYWORDS
        .iter()
        .map(|(domain, keywords)| {
            let patterns = keywords
                .iter()
                .map(|kw| {
                    Regex::new(&format!(r"\b{}\b", regex::escape(kw)))
                        .expect("keyword patterns are static and valid")
                })
                .collect();
            (*domain, patterns)
        })
        .collect()
});

/// Classify input text into the most likely industry domain.
///
/// Scores each domain by total keyword occurrences (word-boundary matches,
/// case-insensitive). Returns `Generic` when no domain reaches two hits.
#[must_use]
pub fn classify(text: &str) -> Domain {
    let lowered = text.to_lowercase();
    let mut scores: HashMap<Domain, usize> = HashMap::new();

    for (domain, patterns) in MATCHERS.iter() {
        let hits: usize = patterns.iter().map(|p| p.find_iter(&lowered).count()).sum();
        scores.insert(*domain, hits);
    }

    let (best, best_score) = scores
        .into_iter()
        .max_by_key(|(domain, score)| (*score, std::cmp::Reverse(domain.as_str())))
        .expect("keyword table is non-empty");

    if best_score < MIN_HITS {
        Domain::Generic
    } else {
        best
    }
}
