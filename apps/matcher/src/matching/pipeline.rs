//! Match mode end to end: job description → query → search → candidate cards.

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::LanguageModel;
use crate::matching::candidate::{extract_candidate, CandidateFields};
use crate::matching::query::generate_query_from_jd;
use crate::vector::VectorStore;

pub const NO_MATCHES_MESSAGE: &str =
    "No matching candidates found. Try refining the job description.";

/// One search hit, rendered for display.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateCard {
    pub resume_id: Uuid,
    pub filename: String,
    pub confidence_score: f64,
    pub candidate: CandidateFields,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    /// The search string the model produced from the job description.
    pub query: String,
    pub candidates: Vec<CandidateCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Runs one match. Query generation and search failures abort the run;
/// per-candidate extraction failures only mark that card.
pub async fn run_match(
    job_description: &str,
    k: usize,
    llm: &dyn LanguageModel,
    store: &VectorStore,
) -> Result<MatchReport, AppError> {
    let query = generate_query_from_jd(job_description, llm).await?;
    let results = store.search_similar(&query, k).await?;
    info!(k, hits = results.len(), "similar resumes retrieved");

    if results.is_empty() {
        return Ok(MatchReport {
            query,
            candidates: Vec::new(),
            message: Some(NO_MATCHES_MESSAGE.to_string()),
        });
    }

    // One at a time, in rank order.
    let mut candidates = Vec::with_capacity(results.len());
    for result in results {
        let candidate = extract_candidate(&result.resume_text, llm).await;
        candidates.push(CandidateCard {
            resume_id: result.resume_id,
            filename: result.metadata.filename,
            confidence_score: result.confidence_score,
            candidate,
        });
    }

    let unparsed = candidates.iter().filter(|c| c.candidate.is_error()).count();
    if unparsed > 0 {
        warn!(unparsed, total = candidates.len(), "some candidate cards have no structured fields");
    }

    Ok(MatchReport {
        query,
        candidates,
        message: None,
    })
}
