// LLM prompt constants for the matching pipeline.

/// Query generation prompt. Replace `{job_description}` before sending.
pub const JD_QUERY_PROMPT: &str = r#"Extract the core skills, tools, and experience required from the following job description.
Return them as a single string that could be used to search for matching candidate resumes.
---
{job_description}"#;

/// System prompt for candidate field extraction; the resume text is the user message.
pub const CANDIDATE_EXTRACTION_SYSTEM: &str =
    "Extract and return raw JSON (no markdown, no explanations) \
    with these fields: name, title, linkedin, email, phone.";

/// Low temperature keeps field extraction close to the source text.
pub const CANDIDATE_EXTRACTION_TEMPERATURE: f32 = 0.2;
