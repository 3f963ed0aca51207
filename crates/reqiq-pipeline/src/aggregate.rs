//! Cross-stage digest and completeness scoring.

use reqiq_artifacts::{Artifact, ArtifactKind};

/// Fixed digest handed to dependent tasks when nothing succeeded.
pub const EMPTY_DIGEST: &str = "No artifacts were successfully generated.";

/// Separator between per-artifact digest lines.
const DIGEST_SEPARATOR: &str = " | ";

/// Build the compact textual digest dependent tasks consume.
///
/// One element-count line per succeeded artifact, joined by a separator.
/// This digest, not the artifacts themselves, bounds the dependent stage's
/// prompt size.
#[must_use]
pub fn digest(artifacts: &[Artifact]) -> String {
    if artifacts.is_empty() {
        return EMPTY_DIGEST.to_string();
    }
    artifacts
        .iter()
        .map(Artifact::digest_line)
        .collect::<Vec<_>>()
        .join(DIGEST_SEPARATOR)
}

/// Weighted completeness score over the kinds that succeeded.
///
/// Additive with fixed per-kind weights summing to 100 over the full kind
/// set, so the score is 0 when nothing succeeded, 100 when everything did,
/// and adding a success can never lower it.
#[must_use]
pub fn completeness_score(succeeded: impl IntoIterator<Item = ArtifactKind>) -> u32 {
    let mut seen = std::collections::BTreeSet::new();
    succeeded
        .into_iter()
        .filter(|kind| seen.insert(*kind))
        .map(|kind| kind.weight())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqiq_artifacts::gap::GapReport;
    use reqiq_artifacts::risk::RiskRegister;

    #[test]
    fn empty_input_yields_the_fallback_digest() {
        assert_eq!(digest(&[]), EMPTY_DIGEST);
    }

    #[test]
    fn digest_joins_per_artifact_lines() {
        let artifacts = vec![
            Artifact::Gap(GapReport { gaps: vec![] }),
            Artifact::Risk(RiskRegister { risks: vec![] }),
        ];
        let text = digest(&artifacts);
        assert_eq!(
            text,
            "gap: 0 gaps identified | risk: 0 risks registered"
        );
    }

    #[test]
    fn score_of_nothing_is_zero_and_everything_is_one_hundred() {
        use strum::IntoEnumIterator;
        assert_eq!(completeness_score([]), 0);
        assert_eq!(completeness_score(ArtifactKind::iter()), 100);
    }

    #[test]
    fn score_is_additive_over_kinds() {
        assert_eq!(
            completeness_score([ArtifactKind::Brd, ArtifactKind::Gap]),
            45
        );
    }

    #[test]
    fn duplicate_kinds_are_counted_once() {
        assert_eq!(
            completeness_score([ArtifactKind::Frd, ArtifactKind::Frd]),
            30
        );
    }
}
