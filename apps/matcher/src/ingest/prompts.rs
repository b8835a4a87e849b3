// Resume distillation prompts.

pub const RESUME_DISTILL_SYSTEM: &str = "You are a smart resume processor.";

/// Distillation prompt template. Replace `{resume_text}` before sending.
///
/// Contact details are kept because candidate cards are later extracted from
/// the distilled text, not the original resume.
pub const RESUME_DISTILL_PROMPT: &str = r#"Extract only the most relevant and important information from this resume that would help match it to a job description. Include key skills, job titles, education, certifications, and work experience.
Also keep the candidate's name, email address, phone number, and LinkedIn profile URL exactly as written, if available. Return clean, readable text.

Resume Text:
{resume_text}"#;
