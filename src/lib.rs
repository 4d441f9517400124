//! Casebrief: structured legal-judgment analysis over an OpenAI-compatible
//! LLM backend.
//!
//! A stateless HTTP service: `POST /analyze` takes raw judgment text plus an
//! analysis mode and returns mode-specific structured JSON, with a single
//! bounded repair retry when the model's first answer is not valid JSON.

pub mod analysis;
pub mod config;
pub mod server;
