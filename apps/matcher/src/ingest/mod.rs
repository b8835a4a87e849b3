// Resume ingestion: text extraction, LLM distillation, upload batches.
// Model calls go through llm_client; storage goes through vector::VectorStore.

pub mod extract;
pub mod handlers;
pub mod loader;
pub mod prompts;
pub mod upload;

use thiserror::Error;

use crate::ingest::extract::ExtractionError;
use crate::llm_client::LlmError;
use crate::vector::VectorStoreError;

/// Failure while turning one uploaded file into a stored resume.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Vector store error: {0}")]
    VectorStore(#[from] VectorStoreError),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}
