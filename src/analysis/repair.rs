//! Validation-repair controller: the retry protocol at the heart of the
//! service.
//!
//! Per request: parse the first completion as JSON; on failure, issue one
//! bounded repair call asking the model to re-emit its own output as valid
//! JSON; on a second failure, return a soft envelope carrying a raw sample.
//! The repair is attempted at most once, a deliberate cap on cost and
//! latency. Transport faults from either call propagate as hard errors;
//! only JSON-shape faults are repaired.

use serde_json::Value;
use uuid::Uuid;

use super::client::{ChatClient, ChatMessage};
use super::envelope::{char_prefix, AnalysisOutcome};
use super::AnalysisError;

/// Maximum characters of the first completion embedded in the repair request.
pub const REPAIR_INPUT_MAX_CHARS: usize = 12_000;

const REPAIR_SYSTEM_PROMPT: &str =
    "You are a JSON repair assistant. Return only a valid JSON string, with no additional text.";

/// Normalize completion text before parsing: trim and strip a wrapping
/// fenced-code-block marker (with optional language tag). Applied identically
/// after the first and the repair call.
pub fn normalize_completion(raw: &str) -> String {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
        };
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }
    text.trim().to_string()
}

/// Repair request: fixed repair persona, user message embedding the original
/// (unrepaired) completion, bounded so the repair request itself stays small.
fn build_repair_messages(completion: &str) -> Vec<ChatMessage> {
    let bounded = char_prefix(completion, REPAIR_INPUT_MAX_CHARS);
    vec![
        ChatMessage::system(REPAIR_SYSTEM_PROMPT),
        ChatMessage::user(format!(
            "Repair the following content into valid JSON, preserving its meaning:\n{bounded}"
        )),
    ]
}

/// Run the two-call state machine against an already-built message sequence.
///
/// Exactly one completion call when the first response parses; exactly two
/// otherwise. Never more.
pub async fn complete_structured(
    chat: &dyn ChatClient,
    request_id: Uuid,
    messages: &[ChatMessage],
) -> Result<AnalysisOutcome, AnalysisError> {
    let first = chat.complete(messages).await?;
    let cleaned = normalize_completion(&first);

    match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) => return Ok(AnalysisOutcome::Structured(value)),
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                error = %e,
                completion_chars = cleaned.chars().count(),
                "completion is not valid JSON, issuing repair call"
            );
        }
    }

    let second = chat.complete(&build_repair_messages(&first)).await?;
    let cleaned = normalize_completion(&second);

    match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) => Ok(AnalysisOutcome::Structured(value)),
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                error = %e,
                "repair completion still not valid JSON, returning raw sample"
            );
            Ok(AnalysisOutcome::invalid_json(&cleaned))
        }
    }
}
