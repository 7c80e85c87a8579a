// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt for single-token classification answers.
pub const SINGLE_WORD_SYSTEM: &str = "You are a precise classifier. \
    Respond with exactly one word from the allowed set. \
    Do NOT include punctuation, explanations or apologies.";

/// Placeholder substituted for missing job fields in prompts.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Fills `{name}` markers in one left-to-right pass.
///
/// Substituted text is never re-scanned, so a marker inside a value (a job
/// description containing `{resume}`, say) stays literal. Braces that do not
/// wrap a known name are copied through unchanged.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let known = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });

        match known {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
