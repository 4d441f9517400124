//! HTTP surface consumed by the browser UI: judgment analysis, health, and
//! configuration diagnostics.
//!
//! Every request is handled independently on its own task; the only shared
//! state is the read-only config and the outbound connection pool. A client
//! disconnect drops the handler future, which cancels any in-flight
//! completion call.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::analysis::{
    self, error_body, prompt, repair, AnalysisError, AnalysisOutcome, ChatClient, Mode,
};
use crate::config::Config;

// ---------------------------------------------------------------------------
// App state and router
// ---------------------------------------------------------------------------

pub struct AppState {
    pub config: Config,
    /// Present only when an API key is configured; requests without it fail
    /// with a credential error before any network call.
    pub chat: Option<Arc<dyn ChatClient>>,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self, AnalysisError> {
        let chat: Option<Arc<dyn ChatClient>> = match &config.api_key {
            Some(key) => Some(Arc::new(analysis::CompletionClient::new(
                &config,
                key.clone(),
            )?)),
            None => None,
        };
        Ok(Self { config, chat })
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/analyze", post(handle_analyze))
        .route("/health", get(|| async { "ok" }))
        .route("/diag", get(handle_diag))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// /analyze
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub text: String,
}

async fn handle_analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Response {
    let request_id = Uuid::new_v4();
    let mode = Mode::resolve(request.mode.as_deref());

    match run_analysis(&state, request_id, mode, request.text.trim()).await {
        Ok(outcome) => {
            if let AnalysisOutcome::InvalidJson { .. } = &outcome {
                tracing::warn!(
                    request_id = %request_id,
                    mode = %mode,
                    "returning soft failure: model never produced valid JSON"
                );
            }
            (StatusCode::OK, Json(outcome.into_body())).into_response()
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, mode = %mode, error = %e, "analysis request failed");
            let status = StatusCode::from_u16(e.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(error_body(&e))).into_response()
        }
    }
}

async fn run_analysis(
    state: &AppState,
    request_id: Uuid,
    mode: Mode,
    text: &str,
) -> Result<AnalysisOutcome, AnalysisError> {
    if text.chars().count() < prompt::MIN_TEXT_CHARS {
        return Err(AnalysisError::InputTooShort);
    }

    let chat = state.chat.as_ref().ok_or(AnalysisError::MissingCredential)?;

    tracing::info!(
        request_id = %request_id,
        mode = %mode,
        text_chars = text.chars().count(),
        "analysis request accepted"
    );

    let messages = prompt::build(mode, text);
    repair::complete_structured(chat.as_ref(), request_id, &messages).await
}

// ---------------------------------------------------------------------------
// /diag
// ---------------------------------------------------------------------------

async fn handle_diag(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let network_test = match &state.chat {
        Some(chat) => chat.probe().await,
        None => "skipped",
    };

    Json(json!({
        "status": "ok",
        "has_api_key": state.config.api_key.is_some(),
        "api_key_prefix": state.config.api_key_prefix().unwrap_or_else(|| "none".into()),
        "model": state.config.model,
        "base_url": state.config.base_url,
        "proxy": {
            "url": state.config.proxy_url.clone().unwrap_or_else(|| "not_set".into()),
            "fallback_direct": state.config.proxy_fallback_direct,
        },
        "network_test": network_test,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
