//! Axum route handlers for resume screening, single and batch.

use std::path::PathBuf;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::screening::batch::{batch_to_csv, evaluate_batch, BatchRow};
use crate::screening::pipeline::{ScreeningConfig, ScreeningOutcome, ScreeningRequest};
use crate::state::AppState;
use crate::uploads::save_upload;

#[derive(Debug, Serialize)]
pub struct ScreeningResponse {
    pub session_id: String,
    pub file: String,
    #[serde(flatten)]
    pub outcome: ScreeningOutcome,
}

#[derive(Debug, Deserialize)]
pub struct BatchQuery {
    /// "json" (default) or "csv".
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub session_id: String,
    pub rows: Vec<BatchRow>,
}

/// POST /api/v1/sessions/:id/screenings
///
/// Multipart: `resume` file (.pdf/.txt) + optional `config` text field with
/// partial scoring-config JSON. Missing config fields fall back to defaults.
pub async fn handle_screen_resume(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<ScreeningResponse>, AppError> {
    let mut resume: Option<(String, Bytes)> = None;
    let mut config = ScreeningConfig::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart payload: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => {
                let file_name = field.file_name().unwrap_or("resume.txt").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid resume upload: {e}")))?;
                resume = Some((file_name, data));
            }
            Some("config") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid config field: {e}")))?;
                config = parse_config(&text)?;
            }
            _ => {}
        }
    }

    let (file_name, data) =
        resume.ok_or_else(|| AppError::Validation("resume file field is required".to_string()))?;

    let stored = save_upload(&state.config.resumes_dir(&session_id), &file_name, data)
        .map_err(AppError::Internal)?;
    let stored_name = stored
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.clone());

    let request = ScreeningRequest {
        session_id: session_id.clone(),
        resume_path: stored,
        config,
    };
    let outcome = state.pipeline.evaluate(&request).await?;

    Ok(Json(ScreeningResponse {
        session_id,
        file: stored_name,
        outcome,
    }))
}

/// POST /api/v1/sessions/:id/screenings/batch?format=json|csv
///
/// Multipart: repeated `resume` files + optional `config` text field.
/// Resumes are evaluated sequentially and independently; a failed resume
/// becomes an "ERROR" row instead of aborting the batch.
pub async fn handle_screen_batch(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<BatchQuery>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut paths: Vec<PathBuf> = Vec::new();
    let mut config = ScreeningConfig::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart payload: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => {
                let file_name = field.file_name().unwrap_or("resume.txt").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid resume upload: {e}")))?;
                let stored =
                    save_upload(&state.config.resumes_dir(&session_id), &file_name, data)
                        .map_err(AppError::Internal)?;
                paths.push(stored);
            }
            Some("config") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid config field: {e}")))?;
                config = parse_config(&text)?;
            }
            _ => {}
        }
    }

    if paths.is_empty() {
        return Err(AppError::Validation(
            "at least one resume file is required".to_string(),
        ));
    }

    let rows = evaluate_batch(state.pipeline.as_ref(), &session_id, &paths, &config).await;

    match query.format.as_deref() {
        Some("csv") => {
            let body = batch_to_csv(&rows)?;
            Ok((
                [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
                body,
            )
                .into_response())
        }
        _ => Ok(Json(BatchResponse { session_id, rows }).into_response()),
    }
}

fn parse_config(text: &str) -> Result<ScreeningConfig, AppError> {
    serde_json::from_str(text)
        .map_err(|e| AppError::Validation(format!("invalid config JSON: {e}")))
}
