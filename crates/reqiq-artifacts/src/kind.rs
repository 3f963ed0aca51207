//! Artifact kind identifiers and completeness weights.

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

/// The closed set of artifact kinds a run can produce.
///
/// `Brd`, `Frd`, and `Agile` form the independent set: they consume only the
/// stakeholder input and can run concurrently. `Gap` and `Risk` are the
/// dependent set: they consume a digest of the independent results and run
/// sequentially after the independent barrier, in this order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Business requirements document
    Brd,
    /// Functional requirements document
    Frd,
    /// Agile backlog (epics, stories, Gherkin acceptance criteria)
    Agile,
    /// Requirements gap report
    Gap,
    /// Risk register
    Risk,
}

impl ArtifactKind {
    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Brd => "brd",
            Self::Frd => "frd",
            Self::Agile => "agile",
            Self::Gap => "gap",
            Self::Risk => "risk",
        }
    }

    /// Parse a kind name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "brd" => Some(Self::Brd),
            "frd" => Some(Self::Frd),
            "agile" => Some(Self::Agile),
            "gap" => Some(Self::Gap),
            "risk" => Some(Self::Risk),
            _ => None,
        }
    }

    /// Whether this kind belongs to the independent (concurrent) set.
    #[must_use]
    pub const fn is_independent(&self) -> bool {
        matches!(self, Self::Brd | Self::Frd | Self::Agile)
    }

    /// Completeness weight of this kind. Weights sum to 100 across the full
    /// kind set so a run where everything succeeds scores exactly 100.
    #[must_use]
    pub const fn weight(&self) -> u32 {
        match self {
            Self::Brd => 35,
            Self::Frd => 30,
            Self::Agile => 15,
            Self::Gap => 10,
            Self::Risk => 10,
        }
    }

    /// The independent kinds in canonical order.
    #[must_use]
    pub fn independent_kinds() -> Vec<Self> {
        Self::iter().filter(Self::is_independent).collect()
    }

    /// The dependent kinds in execution order: gap analysis, then risks.
    #[must_use]
    pub const fn dependent_kinds() -> [Self; 2] {
        [Self::Gap, Self::Risk]
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one_hundred() {
        let total: u32 = ArtifactKind::iter().map(|k| k.weight()).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn parse_roundtrips_all_kinds() {
        for kind in ArtifactKind::iter() {
            assert_eq!(ArtifactKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ArtifactKind::parse("unknown"), None);
    }

    #[test]
    fn independent_and_dependent_sets_partition_the_kinds() {
        let independent = ArtifactKind::independent_kinds();
        assert_eq!(
            independent,
            vec![ArtifactKind::Brd, ArtifactKind::Frd, ArtifactKind::Agile]
        );
        for kind in ArtifactKind::dependent_kinds() {
            assert!(!kind.is_independent());
        }
    }

    #[test]
    fn dependent_order_is_gap_then_risk() {
        assert_eq!(
            ArtifactKind::dependent_kinds(),
            [ArtifactKind::Gap, ArtifactKind::Risk]
        );
    }
}
