//! Query Generator: compresses a job description into a short search string.

use tracing::debug;

use crate::llm_client::prompts::{fill, ASSISTANT_SYSTEM};
use crate::llm_client::{LanguageModel, LlmError, Prompt};
use crate::matching::prompts::JD_QUERY_PROMPT;

/// Returns the model's answer trimmed, otherwise verbatim.
/// An empty answer is passed through; searching with it is the caller's call.
pub async fn generate_query_from_jd(
    job_description: &str,
    llm: &dyn LanguageModel,
) -> Result<String, LlmError> {
    let prompt = fill(JD_QUERY_PROMPT, &[("job_description", job_description)]);
    let query = llm.complete(Prompt::new(ASSISTANT_SYSTEM, &prompt)).await?;
    debug!(query = %query, "generated search query");
    Ok(query.trim().to_string())
}
