//! Uniform output contract returned to the caller: parsed JSON on success, a
//! labeled soft-failure body when the model never produced parsable JSON, or
//! a labeled hard-failure body for transport/credential/input faults. Raw
//! model text never reaches the caller unlabeled.

use serde_json::{json, Value};

use super::AnalysisError;

/// Maximum characters of raw model output included in a soft-failure body.
pub const RAW_SAMPLE_MAX_CHARS: usize = 5_000;

/// Prefix of `s` holding at most `max_chars` characters, never splitting a
/// code point.
pub(crate) fn char_prefix(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Terminal outcome of the validation-repair protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// Both the happy path and the repaired path land here: a syntactically
    /// valid JSON value, returned to the caller as-is.
    Structured(Value),
    /// Neither completion parsed. A data-quality outcome, not a system fault:
    /// reported as structured data with HTTP 200.
    InvalidJson { raw: String },
}

impl AnalysisOutcome {
    /// Soft-failure outcome with the raw sample bounded at construction.
    pub fn invalid_json(raw: &str) -> Self {
        AnalysisOutcome::InvalidJson {
            raw: char_prefix(raw, RAW_SAMPLE_MAX_CHARS).to_string(),
        }
    }

    /// Response body for this outcome.
    pub fn into_body(self) -> Value {
        match self {
            AnalysisOutcome::Structured(value) => value,
            AnalysisOutcome::InvalidJson { raw } => json!({
                "ok": false,
                "reason": "LLM_INVALID_JSON",
                "raw": raw,
            }),
        }
    }
}

/// Response body for a hard failure, paired with its HTTP status.
pub fn error_body(error: &AnalysisError) -> Value {
    json!({
        "ok": false,
        "error": error.to_string(),
        "status": error.http_status(),
    })
}
