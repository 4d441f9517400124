use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use casebrief::config::{self, Config};
use casebrief::server::{app, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = Config::from_env();
    if config.api_key.is_none() {
        tracing::warn!(
            "no API key configured; /analyze will fail until XAI_API_KEY or OPENAI_API_KEY is set"
        );
    }

    let state = match AppState::from_config(config.clone()) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!(error = %e, "failed to build completion client");
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(&config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %config.bind_addr, error = %e, "failed to bind listener");
            std::process::exit(1);
        }
    };

    tracing::info!(
        addr = %config.bind_addr,
        base_url = %config.base_url,
        model = %config.model,
        "listening"
    );

    if let Err(e) = axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server error");
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown signal received");
    }
}
