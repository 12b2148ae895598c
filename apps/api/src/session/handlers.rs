//! Axum route handlers for session lifecycle: a session binds one job
//! posting to a user-chosen identifier for the duration of a screening run.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;
use crate::uploads::save_upload;

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub chunks_indexed: usize,
}

#[derive(Debug, Serialize)]
pub struct EndSessionResponse {
    pub session_id: String,
    pub removed: bool,
}

#[derive(Debug, Serialize)]
pub struct SessionResumesResponse {
    pub session_id: String,
    pub resumes: Vec<String>,
}

/// POST /api/v1/sessions
///
/// Multipart: `session_id` text field + `job` file (.pdf/.txt).
/// Re-posting the same identifier rebuilds the index from scratch.
pub async fn handle_create_session(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CreateSessionResponse>, AppError> {
    let mut session_id: Option<String> = None;
    let mut job: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart payload: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("session_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid session_id field: {e}")))?;
                session_id = Some(text);
            }
            Some("job") => {
                let file_name = field.file_name().unwrap_or("job.txt").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid job upload: {e}")))?;
                job = Some((file_name, data));
            }
            _ => {}
        }
    }

    let session_id = session_id
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::Validation("session_id field is required".to_string()))?;
    let (file_name, data) =
        job.ok_or_else(|| AppError::Validation("job file field is required".to_string()))?;

    let dir = state.config.requirements_dir(&session_id);
    let job_path = save_upload(&dir, &file_name, data).map_err(AppError::Internal)?;

    let chunks_indexed = state
        .registry
        .create_or_reset(&session_id, &job_path)
        .await?;

    info!(session_id = %session_id, "session created");
    Ok(Json(CreateSessionResponse {
        session_id,
        chunks_indexed,
    }))
}

/// DELETE /api/v1/sessions/:id
///
/// Tears down the session index and its stored job-posting uploads.
/// Idempotent: ending a session that was never created succeeds.
pub async fn handle_end_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<EndSessionResponse>, AppError> {
    let removed = state.registry.end(&session_id).await;

    let dir = state.config.requirements_dir(&session_id);
    if dir.exists() {
        // Stored postings go with the session; a failed cleanup is not fatal.
        if let Err(e) = std::fs::remove_dir_all(&dir) {
            tracing::warn!(session_id = %session_id, error = %e, "failed to remove session uploads");
        }
    }

    Ok(Json(EndSessionResponse {
        session_id,
        removed,
    }))
}

/// GET /api/v1/sessions/:id/resumes
///
/// Lists the stored resume files already screened under this session.
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResumesResponse>, AppError> {
    let dir = state.config.resumes_dir(&session_id);

    let mut resumes = Vec::new();
    if dir.exists() {
        let entries = std::fs::read_dir(&dir).map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "failed to read resume directory {}: {e}",
                dir.display()
            ))
        })?;
        for entry in entries.flatten() {
            if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                resumes.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
    }
    resumes.sort();

    Ok(Json(SessionResumesResponse {
        session_id,
        resumes,
    }))
}
