//! Resume Loader: extracts a resume file's text and distills it with the LLM
//! into one relevance-focused document.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::ingest::extract::{
    extract_text_blocking, DocumentFormat, ExtractionError, RESUME_FORMATS, RESUME_FORMATS_LABEL,
};
use crate::ingest::prompts::{RESUME_DISTILL_PROMPT, RESUME_DISTILL_SYSTEM};
use crate::ingest::IngestError;
use crate::llm_client::prompts::fill;
use crate::llm_client::{LanguageModel, LlmError, Prompt};
use crate::models::resume::ResumeDocument;

pub struct ResumeLoader {
    llm: Arc<dyn LanguageModel>,
    /// Raw text beyond this many characters is dropped before distillation.
    max_chars: usize,
}

impl ResumeLoader {
    pub fn new(llm: Arc<dyn LanguageModel>, max_chars: usize) -> Self {
        Self { llm, max_chars }
    }

    /// Loads one resume and returns exactly one distilled document.
    ///
    /// The format is checked before any I/O, so an unsupported file never
    /// reaches the model. No retry beyond the client's own transport retries.
    pub async fn load(
        &self,
        path: &Path,
        user_id: Option<String>,
    ) -> Result<ResumeDocument, IngestError> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let format = DocumentFormat::detect(&filename, RESUME_FORMATS, RESUME_FORMATS_LABEL)?;

        let bytes = tokio::fs::read(path).await.map_err(ExtractionError::Io)?;
        let raw_text = extract_text_blocking(format, bytes).await?;
        if raw_text.trim().is_empty() {
            return Err(ExtractionError::EmptyContent.into());
        }

        let resume_text = truncate_chars(&raw_text, self.max_chars);
        if resume_text.len() < raw_text.len() {
            warn!(
                filename = %filename,
                max_chars = self.max_chars,
                "resume text truncated before distillation"
            );
        }

        let prompt = fill(RESUME_DISTILL_PROMPT, &[("resume_text", resume_text)]);
        let distilled = self
            .llm
            .complete(Prompt::new(RESUME_DISTILL_SYSTEM, &prompt))
            .await?;
        if distilled.is_empty() {
            return Err(LlmError::EmptyContent.into());
        }

        let document = ResumeDocument::new(distilled, filename, user_id);
        info!(
            filename = %document.metadata.filename,
            resume_id = %document.metadata.resume_id,
            "resume distilled"
        );
        Ok(document)
    }
}

/// Cuts `text` to at most `max_chars` characters, on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
