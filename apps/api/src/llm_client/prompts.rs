// Shared prompt fragments. Each task defines its own prompt in
// `assistant/prompts.rs`; cross-cutting system instructions live here.

/// System instruction for every call whose response is parsed as JSON.
pub const JSON_ONLY_SYSTEM: &str = "You are an experienced career coach and technical recruiter. \
    You MUST respond with a single valid JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// System instruction for calls that return prose (cover letters, tailored resumes).
pub const WRITER_SYSTEM: &str = "You are an experienced career coach who writes clear, \
    specific, honest application material. Never invent employers, degrees, dates or \
    metrics that are not present in the candidate's resume. Respond with the document \
    text only, without commentary.";

/// Caps user-supplied text so a pasted document cannot blow the context window.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 10), "short");
    }
}
