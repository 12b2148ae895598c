//! Batch evaluation — a plain sequential loop over independent pipeline
//! runs. Each resume is fully isolated: one failure becomes an "ERROR" row
//! and the loop moves on.

use std::path::PathBuf;

use serde::Serialize;
use tracing::warn;

use crate::errors::AppError;
use crate::screening::pipeline::{ScreeningConfig, ScreeningPipeline, ScreeningRequest};

/// One row per evaluated resume.
#[derive(Debug, Clone, Serialize)]
pub struct BatchRow {
    pub file: String,
    pub decision: String,
    pub total: Option<u32>,
    pub reasons: Vec<String>,
}

/// Evaluates every resume in order against the same session and config.
/// Always returns exactly one row per input path.
pub async fn evaluate_batch(
    pipeline: &ScreeningPipeline,
    session_id: &str,
    resume_paths: &[PathBuf],
    config: &ScreeningConfig,
) -> Vec<BatchRow> {
    let mut rows = Vec::with_capacity(resume_paths.len());

    for path in resume_paths {
        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let request = ScreeningRequest {
            session_id: session_id.to_string(),
            resume_path: path.clone(),
            config: config.clone(),
        };

        match pipeline.evaluate(&request).await {
            Ok(outcome) => rows.push(BatchRow {
                file,
                decision: outcome.decision.decision,
                total: Some(outcome.decision.score.total),
                reasons: outcome.decision.reasons,
            }),
            Err(e) => {
                warn!(file = %file, error = %e, "batch row failed");
                rows.push(BatchRow {
                    file,
                    decision: "ERROR".to_string(),
                    total: None,
                    reasons: vec![e.to_string()],
                });
            }
        }
    }

    rows
}

/// Serializes batch rows as UTF-8 CSV with columns `file`, `decision`,
/// `total`, `reasons`. Reasons are packed into one compact JSON string list
/// per row.
pub fn batch_to_csv(rows: &[BatchRow]) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["file", "decision", "total", "reasons"])
        .map_err(|e| AppError::Internal(e.into()))?;

    for row in rows {
        let total = row.total.map(|t| t.to_string()).unwrap_or_default();
        let reasons =
            serde_json::to_string(&row.reasons).map_err(|e| AppError::Internal(e.into()))?;
        writer
            .write_record([
                row.file.as_str(),
                row.decision.as_str(),
                total.as_str(),
                reasons.as_str(),
            ])
            .map_err(|e| AppError::Internal(e.into()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(e.into()))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(e.into()))
}
