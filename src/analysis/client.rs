//! Single-attempt chat-completion client for an OpenAI-compatible backend.
//!
//! One invocation means one outbound POST; the bounded repair retry is the
//! controller's concern (`repair.rs`), never this module's. The `ChatClient`
//! trait is the seam the controller and the HTTP handlers depend on, so tests
//! run against `MockChatClient` without a network.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::envelope::char_prefix;
use super::AnalysisError;
use crate::config::Config;

/// Fixed sampling temperature. Kept low to bias the model toward
/// deterministic, exemplar-faithful output.
pub const TEMPERATURE: f64 = 0.2;

/// Maximum characters of an upstream error body carried in an error.
const MAX_ERROR_BODY_CHARS: usize = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One entry of the ordered message sequence. Order is significant:
/// system first, then user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Interface for sending one ordered message sequence to the model and
/// receiving the completion text.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Issue exactly one completion request and return the generated text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, AnalysisError>;

    /// Lightweight reachability probe for diagnostics.
    async fn probe(&self) -> &'static str {
        "unknown"
    }
}

/// Request body for `POST {base_url}/chat/completions`.
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f64,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Response envelope from the chat-completions endpoint. Only the first
/// choice's message content is consumed.
#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: ChoiceMessage,
}

#[derive(Deserialize, Default)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Production `ChatClient` backed by reqwest.
///
/// Holds a prebuilt connection pool with the wall-clock timeout baked in, so
/// concurrent requests share it without cross-request interference. When a
/// proxy is configured with direct fallback enabled, a second proxy-free pool
/// is kept for the one permitted fallback attempt.
pub struct CompletionClient {
    http: reqwest::Client,
    direct: Option<reqwest::Client>,
    base_url: String,
    model: String,
    api_key: String,
    max_tokens: Option<u32>,
    timeout_secs: u64,
}

impl CompletionClient {
    pub fn new(config: &Config, api_key: String) -> Result<Self, AnalysisError> {
        let http = build_http(config.timeout_secs, config.proxy_url.as_deref())?;
        let direct = if config.proxy_url.is_some() && config.proxy_fallback_direct {
            Some(build_http(config.timeout_secs, None)?)
        } else {
            None
        };

        Ok(Self {
            http,
            direct,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            max_tokens: config.max_tokens,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send(
        &self,
        http: &reqwest::Client,
        url: &str,
        body: &ChatCompletionRequest<'_>,
    ) -> Result<reqwest::Response, reqwest::Error> {
        http.post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
    }

    fn map_send_error(&self, e: reqwest::Error) -> AnalysisError {
        if e.is_timeout() {
            AnalysisError::Timeout(self.timeout_secs)
        } else {
            AnalysisError::Network(e.to_string())
        }
    }
}

fn build_http(timeout_secs: u64, proxy_url: Option<&str>) -> Result<reqwest::Client, AnalysisError> {
    let mut builder =
        reqwest::Client::builder().timeout(std::time::Duration::from_secs(timeout_secs));

    if let Some(url) = proxy_url {
        let proxy =
            reqwest::Proxy::all(url).map_err(|e| AnalysisError::Network(e.to_string()))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| AnalysisError::Network(e.to_string()))
}

#[async_trait]
impl ChatClient for CompletionClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, AnalysisError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: &self.model,
            temperature: TEMPERATURE,
            messages,
            max_tokens: self.max_tokens,
        };

        let response = match self.send(&self.http, &url, &body).await {
            Ok(r) => r,
            Err(e) if e.is_connect() => {
                if let Some(direct) = &self.direct {
                    tracing::warn!(
                        error = %e,
                        "proxy connection failed, retrying on a direct connection"
                    );
                    self.send(direct, &url, &body)
                        .await
                        .map_err(|e| self.map_send_error(e))?
                } else {
                    return Err(AnalysisError::Network(e.to_string()));
                }
            }
            Err(e) => return Err(self.map_send_error(e)),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::UpstreamHttp {
                status: status.as_u16(),
                body: char_prefix(&body, MAX_ERROR_BODY_CHARS).to_string(),
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::ResponseDecode(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(AnalysisError::EmptyCompletion)
    }

    async fn probe(&self) -> &'static str {
        let url = format!("{}/models", self.base_url);
        match self.http.get(&url).bearer_auth(&self.api_key).send().await {
            Ok(r) if r.status().is_success() => "connected",
            Ok(_) => "api_error",
            Err(_) => "failed",
        }
    }
}

/// Mock chat client for tests. Replays scripted outcomes in order and
/// records every message sequence it was called with.
pub struct MockChatClient {
    script: std::sync::Mutex<std::collections::VecDeque<Result<String, AnalysisError>>>,
    calls: std::sync::Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockChatClient {
    pub fn new(responses: Vec<&str>) -> Self {
        Self::with_outcomes(responses.into_iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn with_outcomes(outcomes: Vec<Result<String, AnalysisError>>) -> Self {
        Self {
            script: std::sync::Mutex::new(outcomes.into()),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Number of completion calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Message sequences received, in call order.
    pub fn recorded_calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, AnalysisError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(AnalysisError::EmptyCompletion))
    }
}
