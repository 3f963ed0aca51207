//! The tagged union over all artifact payloads.

use serde::{Deserialize, Serialize};

use crate::agile::AgileBacklog;
use crate::brd::BrdDocument;
use crate::frd::FrdDocument;
use crate::gap::GapReport;
use crate::kind::ArtifactKind;
use crate::risk::RiskRegister;

/// One validated artifact, tagged by kind.
///
/// The `kind`/`payload` representation keeps persisted artifacts
/// self-describing: `{"kind": "brd", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "lowercase")]
pub enum Artifact {
    Brd(BrdDocument),
    Frd(FrdDocument),
    Agile(AgileBacklog),
    Gap(GapReport),
    Risk(RiskRegister),
}

impl Artifact {
    /// The kind tag of this artifact.
    #[must_use]
    pub fn kind(&self) -> ArtifactKind {
        match self {
            Self::Brd(_) => ArtifactKind::Brd,
            Self::Frd(_) => ArtifactKind::Frd,
            Self::Agile(_) => ArtifactKind::Agile,
            Self::Gap(_) => ArtifactKind::Gap,
            Self::Risk(_) => ArtifactKind::Risk,
        }
    }

    /// One-line element-count digest of this artifact.
    ///
    /// These lines are what the dependent stage sees instead of full
    /// artifacts, which keeps dependent prompt size bounded regardless of
    /// how large the generated documents are.
    #[must_use]
    pub fn digest_line(&self) -> String {
        match self {
            Self::Brd(doc) => format!(
                "brd: {} business requirements, {} functional requirements, {} stakeholders, {} risks",
                doc.business_requirements.len(),
                doc.functional_requirements.len(),
                doc.stakeholders.len(),
                doc.risks.len()
            ),
            Self::Frd(doc) => format!(
                "frd: {} functional requirements, {} non-functional requirements, {} integration points",
                doc.functional_requirements.len(),
                doc.non_functional_requirements.len(),
                doc.integration_points.len()
            ),
            Self::Agile(backlog) => format!(
                "agile: {} epics, {} stories",
                backlog.epics.len(),
                backlog.story_count()
            ),
            Self::Gap(report) => format!("gap: {} gaps identified", report.gaps.len()),
            Self::Risk(register) => format!("risk: {} risks registered", register.risks.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_artifact_round_trips_with_kind_tag() {
        let artifact = Artifact::Gap(GapReport { gaps: vec![] });
        let value = serde_json::to_value(&artifact).unwrap();
        assert_eq!(value["kind"], "gap");
        let back: Artifact = serde_json::from_value(value).unwrap();
        assert_eq!(back.kind(), ArtifactKind::Gap);
    }

    #[test]
    fn digest_line_counts_elements() {
        let artifact = Artifact::Risk(RiskRegister { risks: vec![] });
        assert_eq!(artifact.digest_line(), "risk: 0 risks registered");
    }
}
