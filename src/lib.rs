//! reqiq — turns raw stakeholder notes into schema-validated BA artifacts
//!
//! reqiq feeds a block of unstructured stakeholder text through a concurrent
//! generation pipeline and returns structured, contract-validated artifacts:
//! a business requirements document, a functional requirements document, an
//! agile backlog, and — derived from a digest of those — a requirements gap
//! report and a risk register. Every run carries a usage receipt (per-attempt
//! token counts, latency, estimated cost) and a weighted completeness score.
//!
//! # Quick start (CLI)
//!
//! ```bash
//! # Generate all three primary artifacts plus gap and risk analysis
//! reqiq generate notes.txt --domain auto --out artifacts/
//!
//! # Exercise the full pipeline offline with the fixture backend
//! reqiq generate notes.txt --dry-run --json
//!
//! # Just classify the industry domain of an input
//! reqiq classify notes.txt
//! ```
//!
//! # Quick start (library)
//!
//! ```no_run
//! use reqiq::{Pipeline, PipelineRequest};
//! use reqiq_artifacts::ArtifactKind;
//! use reqiq_config::Config;
//! use reqiq_domain::Domain;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::discover()?;
//! let pipeline = Pipeline::from_config(&config)?;
//! let run = pipeline
//!     .run(PipelineRequest {
//!         input_text: "Stakeholder notes...".to_string(),
//!         domain: Domain::Generic,
//!         requested_kinds: ArtifactKind::independent_kinds(),
//!     })
//!     .await?;
//! println!("score: {}", run.completeness_score);
//! # Ok(())
//! # }
//! ```
//!
//! Partial failure is a normal outcome: inspect `run.errors` and the
//! presence of each artifact rather than expecting an `Err`.

pub mod cli;
pub mod exit_codes;
pub mod persist;

pub use reqiq_artifacts::{Artifact, ArtifactKind};
pub use reqiq_config::Config;
pub use reqiq_domain::Domain;
pub use reqiq_pipeline::{Pipeline, PipelineRequest, PipelineRun};

/// Upper bound applied to raw input before it enters the pipeline, chars.
pub const INPUT_CHAR_CAP: usize = 100_000;
