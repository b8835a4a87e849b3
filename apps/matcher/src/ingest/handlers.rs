//! Axum route handlers for resume uploads.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::ingest::upload::{upload_resumes, UploadOutcome, UploadedFile};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub uploaded: usize,
    pub failed: usize,
    pub results: Vec<UploadOutcome>,
}

/// POST /api/v1/resumes
///
/// Multipart body: one or more `files` parts plus an optional `user_id`.
/// Always answers 200 once the batch ran; per-file failures are in `results`.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut files = Vec::new();
    let mut user_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "files" | "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid file part: {e}")))?;
                files.push(UploadedFile { filename, bytes });
            }
            "user_id" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid user_id: {e}")))?;
                let value = value.trim();
                if !value.is_empty() {
                    user_id = Some(value.to_string());
                }
            }
            _ => {}
        }
    }

    if files.is_empty() {
        return Err(AppError::Validation(
            "Upload at least one PDF or DOCX resume".to_string(),
        ));
    }

    let results = upload_resumes(
        files,
        user_id,
        &state.loader,
        &state.store,
        &state.config.resume_dir,
    )
    .await;

    let uploaded = results.iter().filter(|r| r.is_uploaded()).count();
    Ok(Json(UploadResponse {
        uploaded,
        failed: results.len() - uploaded,
        results,
    }))
}
