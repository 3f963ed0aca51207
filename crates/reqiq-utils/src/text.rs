//! Text truncation helpers.
//!
//! Diagnostics fed back into corrective prompts are capped at 200 characters;
//! raw stakeholder input is capped upstream of the pipeline. Both caps cut on
//! a char boundary, never mid-code-point.

/// Maximum length of a validation diagnostic reused in a corrective prompt.
pub const DIAGNOSTIC_CAP: usize = 200;

/// Truncate `s` to at most `max_chars` characters.
#[must_use]
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncate a validation diagnostic for inclusion in a corrective prompt.
#[must_use]
pub fn truncate_diagnostic(s: &str) -> &str {
    truncate_chars(s, DIAGNOSTIC_CAP)
}
