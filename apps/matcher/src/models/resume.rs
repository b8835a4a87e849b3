use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata attached to every stored resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeMetadata {
    pub filename: String,
    pub resume_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// A resume as stored in the vector index.
///
/// `text` is always the model-distilled summary; the raw extracted text is
/// never kept. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub text: String,
    pub metadata: ResumeMetadata,
}

impl ResumeDocument {
    /// Wraps distilled text with a freshly generated `resume_id`.
    pub fn new(text: String, filename: String, user_id: Option<String>) -> Self {
        Self {
            text,
            metadata: ResumeMetadata {
                filename,
                resume_id: Uuid::new_v4(),
                user_id,
                uploaded_at: Utc::now(),
            },
        }
    }
}

/// One similarity-search hit. Produced per search, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub resume_id: Uuid,
    /// 0–100, higher means more similar.
    pub confidence_score: f64,
    pub resume_text: String,
    pub metadata: ResumeMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_document_gets_its_own_resume_id() {
        let a = ResumeDocument::new("same".into(), "cv.pdf".into(), None);
        let b = ResumeDocument::new("same".into(), "cv.pdf".into(), None);
        assert_ne!(a.metadata.resume_id, b.metadata.resume_id);
    }

    #[test]
    fn test_missing_user_id_is_omitted_from_json() {
        let doc = ResumeDocument::new("text".into(), "cv.pdf".into(), None);
        let json = serde_json::to_value(&doc.metadata).unwrap();
        assert!(json.get("user_id").is_none());
        assert_eq!(json["filename"], "cv.pdf");
    }
}
