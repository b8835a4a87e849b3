//! Structured candidate extraction: the per-result LLM call that pulls
//! contact fields out of a stored resume.
//!
//! Failures never escape: a bad answer becomes an error marker on that one
//! card and the remaining results are still processed.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::llm_client::{strip_json_fences, LanguageModel, Prompt};
use crate::matching::prompts::{CANDIDATE_EXTRACTION_SYSTEM, CANDIDATE_EXTRACTION_TEMPERATURE};

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredCandidate {
    pub name: String,
    pub title: String,
    pub linkedin: String,
    pub email: String,
    pub phone: String,
}

impl StructuredCandidate {
    /// Parses the model's JSON answer. Missing or empty fields read as "N/A";
    /// numbers (phone numbers, mostly) are kept as their text.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(strip_json_fences(raw))?;
        if !value.is_object() {
            return Err(serde::de::Error::custom("expected a JSON object"));
        }
        Ok(Self {
            name: field(&value, "name"),
            title: field(&value, "title"),
            linkedin: field(&value, "linkedin"),
            email: field(&value, "email"),
            phone: field(&value, "phone"),
        })
    }
}

fn field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// What a candidate card shows: the fields, or why they are missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CandidateFields {
    Parsed(StructuredCandidate),
    /// The model answered, but not with a JSON object.
    InvalidJson { error: String, raw_response: String },
    /// The model call itself failed.
    ExtractionFailed { error: String },
}

impl CandidateFields {
    pub fn is_error(&self) -> bool {
        !matches!(self, CandidateFields::Parsed(_))
    }
}

/// Runs the extraction call for one resume text.
pub async fn extract_candidate(resume_text: &str, llm: &dyn LanguageModel) -> CandidateFields {
    let prompt = Prompt::new(CANDIDATE_EXTRACTION_SYSTEM, resume_text)
        .with_temperature(CANDIDATE_EXTRACTION_TEMPERATURE);

    let raw_response = match llm.complete(prompt).await {
        Ok(text) => text,
        Err(e) => {
            warn!("candidate extraction failed: {e}");
            return CandidateFields::ExtractionFailed {
                error: format!("Parsing error: {e}"),
            };
        }
    };

    match StructuredCandidate::from_json(&raw_response) {
        Ok(candidate) => CandidateFields::Parsed(candidate),
        Err(e) => {
            warn!("model returned invalid JSON: {e}");
            CandidateFields::InvalidJson {
                error: "Invalid JSON".to_string(),
                raw_response,
            }
        }
    }
}
