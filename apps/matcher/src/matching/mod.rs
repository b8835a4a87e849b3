// Match mode: job description → search query → similar resumes → candidate cards.
// All LLM calls go through llm_client.

pub mod candidate;
pub mod handlers;
pub mod jd_source;
pub mod pipeline;
pub mod prompts;
pub mod query;
