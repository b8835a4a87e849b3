//! Axum route handler for match mode.

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::errors::AppError;
use crate::ingest::upload::UploadedFile;
use crate::matching::jd_source::JobDescriptionInput;
use crate::matching::pipeline::{run_match, MatchReport};
use crate::state::AppState;

/// Each hit costs one model call, so a request may ask for at most this many.
pub const MAX_K: usize = 100;

/// POST /api/v1/match
///
/// Multipart body with any of `jd_text`, `jd_file`, `jd_url`, plus an optional `k`.
/// Only the first usable source in that order is read.
pub async fn handle_match(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MatchReport>, AppError> {
    let mut input = JobDescriptionInput::default();
    let mut k = state.config.search_top_k;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "jd_file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid jd_file part: {e}")))?;
                input.file = Some(UploadedFile { filename, bytes });
            }
            "jd_text" | "jd_url" | "k" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid {name} field: {e}")))?;
                match name.as_str() {
                    "jd_text" => input.text = Some(value),
                    "jd_url" => input.url = Some(value),
                    _ => k = parse_k(&value)?,
                }
            }
            _ => {}
        }
    }

    let job_description = input
        .resolve(&state.config.jd_dir, &state.http)
        .await?;

    let report = run_match(&job_description, k, state.llm.as_ref(), &state.store).await?;
    Ok(Json(report))
}

fn parse_k(raw: &str) -> Result<usize, AppError> {
    match raw.trim().parse::<usize>() {
        Ok(k) if (1..=MAX_K).contains(&k) => Ok(k),
        _ => Err(AppError::Validation(format!(
            "k must be an integer between 1 and {MAX_K}, got '{}'",
            raw.trim()
        ))),
    }
}
