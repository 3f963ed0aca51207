//! Industry domain classification and context for reqiq
//!
//! Detects the most likely industry domain from input text with keyword
//! frequency analysis (no generation call needed) and supplies per-domain
//! guidance text that generation prompts splice in. Both operations are pure
//! lookups: unknown or weakly-signaled input maps to the generic fallback.

mod classifier;
mod context;

pub use classifier::classify;
pub use context::context_for;

use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// Closed set of recognized industry domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Banking, financial services, and insurance
    Bfsi,
    Healthcare,
    Saas,
    Generic,
}

impl Domain {
    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bfsi => "bfsi",
            Self::Healthcare => "healthcare",
            Self::Saas => "saas",
            Self::Generic => "generic",
        }
    }

    /// Parse a domain name; anything unrecognized is `Generic`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "bfsi" => Self::Bfsi,
            "healthcare" => Self::Healthcare,
            "saas" => Self::Saas,
            _ => Self::Generic,
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrips_known_domains() {
        for domain in [Domain::Bfsi, Domain::Healthcare, Domain::Saas, Domain::Generic] {
            assert_eq!(Domain::parse(domain.as_str()), domain);
        }
    }

    #[test]
    fn parse_falls_back_to_generic() {
        assert_eq!(Domain::parse("retail"), Domain::Generic);
        assert_eq!(Domain::parse(""), Domain::Generic);
    }
}
