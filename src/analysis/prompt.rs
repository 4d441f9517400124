//! Builds the exact `[system, user]` message pair sent to the model for one
//! analysis request.

use super::client::ChatMessage;
use super::mode::Mode;
use super::registry;

/// Minimum trimmed input length (characters). Enforced by the HTTP layer
/// before the pipeline runs; shorter text is rejected as caller error.
pub const MIN_TEXT_CHARS: usize = 10;

/// Maximum document length interpolated into the user prompt (characters).
pub const MAX_TEXT_CHARS: usize = 12_000;

/// Appended whenever the document was cut at `MAX_TEXT_CHARS`.
pub const TRUNCATION_MARKER: &str = "…[TRUNCATED]";

/// Truncate to the prompt cap, breaking at the last whitespace inside the
/// window when there is one. Counts characters, not bytes; judgment text is
/// routinely CJK and a byte cut could split a code point.
fn truncate_for_prompt(text: &str) -> String {
    match text.char_indices().nth(MAX_TEXT_CHARS) {
        None => text.to_string(),
        Some((cut, _)) => {
            let window = &text[..cut];
            match window.rfind(|c: char| c.is_whitespace()) {
                Some(pos) => format!("{}{}", &text[..pos], TRUNCATION_MARKER),
                None => format!("{window}{TRUNCATION_MARKER}"),
            }
        }
    }
}

/// Build the message sequence for one request: the mode's persona, then a
/// user message embedding the mode's exemplar and the (possibly truncated)
/// document text.
pub fn build(mode: Mode, raw_text: &str) -> Vec<ChatMessage> {
    let spec = registry::lookup(mode);
    let text = truncate_for_prompt(raw_text);
    let user = format!(
        "Return JSON ONLY (no extra words):\n{}\n\n[ORIGINAL TEXT]\n{}",
        spec.schema, text
    );
    vec![
        ChatMessage::system(spec.system_prompt),
        ChatMessage::user(user),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::client::Role;

    #[test]
    fn builds_system_then_user() {
        let messages = build(Mode::Public, "The court ordered the defendant to pay.");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
    }

    #[test]
    fn user_message_embeds_schema_and_text() {
        let messages = build(Mode::Lawyer, "Plaintiff claims unpaid service fees.");
        let user = &messages[1].content;
        assert!(user.contains(registry::lookup(Mode::Lawyer).schema));
        assert!(user.contains("[ORIGINAL TEXT]"));
        assert!(user.contains("Plaintiff claims unpaid service fees."));
    }

    #[test]
    fn short_text_is_not_truncated() {
        let messages = build(Mode::Media, "A short judgment summary for the press.");
        assert!(!messages[1].content.contains(TRUNCATION_MARKER));
    }

    #[test]
    fn long_text_is_cut_with_marker() {
        let long = "word ".repeat(5_000); // 25k chars
        let truncated = truncate_for_prompt(&long);
        assert!(truncated.ends_with(TRUNCATION_MARKER));
        let marker_chars = TRUNCATION_MARKER.chars().count();
        assert!(truncated.chars().count() <= MAX_TEXT_CHARS + marker_chars);
    }

    #[test]
    fn cut_lands_on_word_boundary_when_possible() {
        let long = "alpha ".repeat(5_000);
        let truncated = truncate_for_prompt(&long);
        let body = truncated.strip_suffix(TRUNCATION_MARKER).unwrap();
        assert!(body.ends_with("alpha"));
    }

    #[test]
    fn cjk_text_without_whitespace_cuts_cleanly() {
        let long = "判".repeat(MAX_TEXT_CHARS + 500);
        let truncated = truncate_for_prompt(&long);
        assert!(truncated.ends_with(TRUNCATION_MARKER));
        let body = truncated.strip_suffix(TRUNCATION_MARKER).unwrap();
        assert_eq!(body.chars().count(), MAX_TEXT_CHARS);
        assert!(body.chars().all(|c| c == '判'));
    }

    #[test]
    fn exactly_at_cap_is_untouched() {
        let text = "a".repeat(MAX_TEXT_CHARS);
        assert_eq!(truncate_for_prompt(&text), text);
    }
}
