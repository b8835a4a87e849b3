// Shared prompt fragments.
// Each pipeline stage that calls the model keeps its own prompts.rs alongside it.

/// Neutral system prompt for free-text answers.
pub const ASSISTANT_SYSTEM: &str = "You're a helpful assistant.";

/// Substitutes `{key}` placeholders in a prompt template.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{key}}}"), value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_replaces_every_placeholder() {
        let out = fill("a={a} b={b} a={a}", &[("a", "1"), ("b", "2")]);
        assert_eq!(out, "a=1 b=2 a=1");
    }

    #[test]
    fn test_fill_leaves_unknown_placeholders() {
        assert_eq!(fill("{x}", &[("y", "1")]), "{x}");
    }
}
