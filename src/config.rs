//! Environment-supplied configuration, read once at startup into an immutable
//! value shared by every request handler.

/// Application-level constants
pub const APP_NAME: &str = "casebrief";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// OpenAI-compatible backend defaults (xAI direct; override `XAI_BASE` to
/// point at any compatible endpoint).
pub const DEFAULT_BASE_URL: &str = "https://api.x.ai/v1";
pub const DEFAULT_MODEL: &str = "grok-4";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    format!("{APP_NAME}=info,tower_http=warn")
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Listen address for the HTTP surface (`CASEBRIEF_ADDR`).
    pub bind_addr: String,
    /// Chat-completions base URL (`XAI_BASE`).
    pub base_url: String,
    /// Model name: `XAI_MODEL`, then `OPENAI_MODEL`.
    pub model: String,
    /// Bearer token: `XAI_API_KEY`, then `OPENAI_API_KEY`. Absence is
    /// reported per request as a credential failure, not a startup panic,
    /// so diagnostics stay reachable on a misconfigured deploy.
    pub api_key: Option<String>,
    /// Outbound proxy: `HTTPS_PROXY`, then `HTTP_PROXY`.
    pub proxy_url: Option<String>,
    /// `LLM_PROXY_FALLBACK`: permit one direct retry when the proxy cannot
    /// connect. Off by default.
    pub proxy_fallback_direct: bool,
    /// Wall-clock timeout per outbound call (`LLM_TIMEOUT_SECS`).
    pub timeout_secs: u64,
    /// Optional completion token cap (`LLM_MAX_TOKENS`).
    pub max_tokens: Option<u32>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env_non_empty("CASEBRIEF_ADDR")
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            base_url: env_non_empty("XAI_BASE").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: env_non_empty("XAI_MODEL")
                .or_else(|| env_non_empty("OPENAI_MODEL"))
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key: env_non_empty("XAI_API_KEY").or_else(|| env_non_empty("OPENAI_API_KEY")),
            proxy_url: env_non_empty("HTTPS_PROXY").or_else(|| env_non_empty("HTTP_PROXY")),
            proxy_fallback_direct: env_flag("LLM_PROXY_FALLBACK"),
            timeout_secs: env_non_empty("LLM_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            max_tokens: env_non_empty("LLM_MAX_TOKENS").and_then(|v| v.parse().ok()),
        }
    }

    /// Short key prefix for diagnostics output; never the key itself.
    pub fn api_key_prefix(&self) -> Option<String> {
        self.api_key
            .as_ref()
            .map(|key| format!("{}...", key.chars().take(7).collect::<String>()))
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_flag(name: &str) -> bool {
    matches!(
        env_non_empty(name).map(|v| v.to_ascii_lowercase()).as_deref(),
        Some("1") | Some("true") | Some("yes")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn env_non_empty_ignores_blank_values() {
        std::env::set_var("CASEBRIEF_TEST_BLANK", "   ");
        assert_eq!(env_non_empty("CASEBRIEF_TEST_BLANK"), None);
        std::env::set_var("CASEBRIEF_TEST_BLANK", " value ");
        assert_eq!(env_non_empty("CASEBRIEF_TEST_BLANK"), Some("value".into()));
        std::env::remove_var("CASEBRIEF_TEST_BLANK");
    }

    #[test]
    fn env_flag_accepts_common_truthy_values() {
        for (raw, expected) in [("1", true), ("true", true), ("YES", true), ("0", false)] {
            std::env::set_var("CASEBRIEF_TEST_FLAG", raw);
            assert_eq!(env_flag("CASEBRIEF_TEST_FLAG"), expected, "value {raw}");
        }
        std::env::remove_var("CASEBRIEF_TEST_FLAG");
        assert!(!env_flag("CASEBRIEF_TEST_FLAG"));
    }

    #[test]
    fn api_key_prefix_redacts() {
        let config = Config {
            bind_addr: DEFAULT_BIND_ADDR.into(),
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            api_key: Some("sk-1234567890abcdef".into()),
            proxy_url: None,
            proxy_fallback_direct: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_tokens: None,
        };
        assert_eq!(config.api_key_prefix().unwrap(), "sk-1234...");
    }

    #[test]
    fn missing_key_has_no_prefix() {
        let config = Config {
            bind_addr: DEFAULT_BIND_ADDR.into(),
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            api_key: None,
            proxy_url: None,
            proxy_fallback_direct: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_tokens: None,
        };
        assert_eq!(config.api_key_prefix(), None);
    }
}
