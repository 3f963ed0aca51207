//! Persistence sink for finalized runs.
//!
//! Writes one JSON file per artifact plus a `run.json` receipt carrying the
//! full run (score, errors, telemetry, totals) and a blake3 fingerprint over
//! the artifact bytes. The on-disk layout is a boundary, not a schema: other
//! sinks (databases, document renderers) consume the same `PipelineRun`.

use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::Serialize;

use reqiq_pipeline::PipelineRun;

/// Receipt wrapper persisted as `run.json`.
#[derive(Debug, Serialize)]
struct RunReceipt<'a> {
    /// Hex blake3 hash over the serialized artifacts, in run order
    artifact_fingerprint: String,
    #[serde(flatten)]
    run: &'a PipelineRun,
}

/// Write a finalized run into `out_dir`, creating it if needed.
///
/// Produces `<kind>.json` for each artifact and `run.json` for the receipt.
/// Returns the paths written, receipt last.
///
/// # Errors
/// Returns an error when the directory cannot be created or a file cannot
/// be serialized or written.
pub fn write_run(out_dir: &Utf8Path, run: &PipelineRun) -> Result<Vec<String>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory {out_dir}"))?;

    let mut written = Vec::new();
    let mut hasher = blake3::Hasher::new();

    for artifact in &run.artifacts {
        let path = out_dir.join(format!("{}.json", artifact.kind()));
        let body = serde_json::to_vec_pretty(artifact)
            .with_context(|| format!("failed to serialize {} artifact", artifact.kind()))?;
        hasher.update(&body);
        std::fs::write(&path, &body).with_context(|| format!("failed to write {path}"))?;
        written.push(path.to_string());
    }

    let receipt = RunReceipt {
        artifact_fingerprint: hasher.finalize().to_hex().to_string(),
        run,
    };
    let receipt_path = out_dir.join("run.json");
    let body = serde_json::to_vec_pretty(&receipt).context("failed to serialize run receipt")?;
    std::fs::write(&receipt_path, &body)
        .with_context(|| format!("failed to write {receipt_path}"))?;
    written.push(receipt_path.to_string());

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use chrono::Utc;
    use reqiq_artifacts::gap::GapReport;
    use reqiq_artifacts::Artifact;
    use reqiq_domain::Domain;
    use reqiq_pipeline::TaskSummary;

    fn sample_run() -> PipelineRun {
        PipelineRun {
            requested_kinds: vec![],
            domain: Domain::Generic,
            artifacts: vec![Artifact::Gap(GapReport { gaps: vec![] })],
            tasks: vec![TaskSummary {
                kind: reqiq_artifacts::ArtifactKind::Gap,
                status: reqiq_pipeline::TaskStatus::Succeeded,
                attempts: 1,
            }],
            errors: vec![],
            telemetry: vec![],
            digest: "gap: 0 gaps identified".to_string(),
            completeness_score: 10,
            total_tokens: 0,
            estimated_cost_usd: 0.0,
            started_at: Utc::now(),
            duration_ms: 1,
        }
    }

    #[test]
    fn writes_artifacts_and_receipt() {
        let dir = tempfile::tempdir().unwrap();
        let out: Utf8PathBuf = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();

        let written = write_run(&out, &sample_run()).unwrap();

        assert_eq!(written.len(), 2);
        assert!(out.join("gap.json").as_std_path().exists());

        let receipt: serde_json::Value =
            serde_json::from_slice(&std::fs::read(out.join("run.json")).unwrap()).unwrap();
        assert_eq!(receipt["completeness_score"], 10);
        assert!(receipt["artifact_fingerprint"].as_str().unwrap().len() == 64);
    }

    #[test]
    fn fingerprint_tracks_artifact_bytes() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();
        let out_a = Utf8PathBuf::from_path_buf(dir_a.path().to_path_buf()).unwrap();
        let out_b = Utf8PathBuf::from_path_buf(dir_b.path().to_path_buf()).unwrap();

        let run = sample_run();
        let mut changed = sample_run();
        changed.artifacts = vec![];

        write_run(&out_a, &run).unwrap();
        write_run(&out_b, &changed).unwrap();

        let fp = |dir: &Utf8Path| -> String {
            let v: serde_json::Value =
                serde_json::from_slice(&std::fs::read(dir.join("run.json")).unwrap()).unwrap();
            v["artifact_fingerprint"].as_str().unwrap().to_string()
        };
        assert_ne!(fp(&out_a), fp(&out_b));
    }
}
