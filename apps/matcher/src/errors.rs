use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ingest::extract::ExtractionError;
use crate::llm_client::LlmError;
use crate::matching::jd_source::JobDescriptionError;
use crate::vector::VectorStoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    EmptyContent(String),

    #[error("Please provide a job description")]
    MissingJobDescription,

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::UnsupportedFormat { .. } => AppError::UnsupportedFormat(err.to_string()),
            ExtractionError::EmptyContent => AppError::EmptyContent(err.to_string()),
            ExtractionError::Pdf(_) | ExtractionError::Docx(_) | ExtractionError::Xml(_) => {
                AppError::EmptyContent(format!("Failed to extract content: {err}"))
            }
            ExtractionError::Io(e) => AppError::Internal(e.into()),
        }
    }
}

impl From<JobDescriptionError> for AppError {
    fn from(err: JobDescriptionError) -> Self {
        match err {
            JobDescriptionError::Missing => AppError::MissingJobDescription,
            JobDescriptionError::EmptyFile | JobDescriptionError::EmptyUrl => {
                AppError::EmptyContent(err.to_string())
            }
            JobDescriptionError::InvalidUrl(_) => AppError::Validation(err.to_string()),
            JobDescriptionError::FetchStatus { .. } | JobDescriptionError::Http(_) => {
                AppError::EmptyContent(format!("{}: {err}", JobDescriptionError::EmptyUrl))
            }
            JobDescriptionError::Extraction(e) => e.into(),
            other => AppError::Internal(other.into()),
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::Llm(err.to_string())
    }
}

impl From<VectorStoreError> for AppError {
    fn from(err: VectorStoreError) -> Self {
        AppError::VectorStore(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnsupportedFormat(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_FORMAT",
                msg.clone(),
            ),
            AppError::EmptyContent(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EMPTY_CONTENT",
                msg.clone(),
            ),
            AppError::MissingJobDescription => (
                StatusCode::BAD_REQUEST,
                "MISSING_JOB_DESCRIPTION",
                self.to_string(),
            ),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::VectorStore(msg) => {
                tracing::error!("Vector store error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "VECTOR_STORE_ERROR",
                    "A vector store error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
