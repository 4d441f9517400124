//! Judgment-analysis pipeline: mode registry → prompt builder → completion
//! client → validation-repair controller → result envelope.

pub mod client;
pub mod envelope;
pub mod mode;
pub mod prompt;
pub mod registry;
pub mod repair;

pub use client::{ChatClient, ChatMessage, CompletionClient, MockChatClient, Role};
pub use envelope::{error_body, AnalysisOutcome};
pub use mode::Mode;
pub use registry::{lookup, ModeSpec};

use thiserror::Error;

/// Hard failures of the analysis pipeline. Every variant maps to an explicit
/// HTTP status; none is ever silently dropped. The soft "model never produced
/// JSON" outcome is not an error; see [`envelope::AnalysisOutcome`].
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("input text is empty or too short for analysis (< {} characters)", prompt::MIN_TEXT_CHARS)]
    InputTooShort,

    #[error("no API key configured (set XAI_API_KEY or OPENAI_API_KEY)")]
    MissingCredential,

    #[error("upstream returned error (status {status}): {body}")]
    UpstreamHttp { status: u16, body: String },

    #[error("upstream request timed out after {0}s")]
    Timeout(u64),

    #[error("network error reaching upstream: {0}")]
    Network(String),

    #[error("could not decode upstream response: {0}")]
    ResponseDecode(String),

    #[error("upstream returned an empty completion")]
    EmptyCompletion,
}

impl AnalysisError {
    /// HTTP status this failure surfaces as: 400 for caller input errors,
    /// 500 for credential/upstream/system faults.
    pub fn http_status(&self) -> u16 {
        match self {
            AnalysisError::InputTooShort => 400,
            _ => 500,
        }
    }
}
