//! Artifact kinds, schemas, contracts, and prompts for reqiq
//!
//! An artifact is one structured document produced by a single generation
//! task: a business requirements document, a functional requirements
//! document, an agile backlog, a gap report, or a risk register. Each kind
//! carries its own typed payload; [`Artifact`] is the tagged union over
//! them. [`contract::parse_artifact`] turns a raw completion into a typed
//! artifact or a retryable [`ContractViolation`].

pub mod agile;
pub mod brd;
pub mod contract;
pub mod frd;
pub mod gap;
pub mod kind;
pub mod prompts;
pub mod risk;
pub mod shared;

mod artifact;

pub use artifact::Artifact;
pub use kind::ArtifactKind;
pub use reqiq_utils::error::ContractViolation;
pub use shared::{Confidence, ConfidenceSection, Severity};
