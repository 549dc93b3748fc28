//! Environment configuration for the relay engine.

use std::env;
use std::time::Duration;

use conversation_api::StreamConfig;
use derived_views::DEFAULT_CONTEXT_BUDGET;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Base URL of the session server.
    pub base_url: String,
    /// Token budget the context utilization percentage is measured against.
    pub context_budget: u64,
    /// Timeout for non-streaming requests; the stream itself is never
    /// timed out.
    pub timeout: Option<Duration>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            base_url: conversation_api::url::DEFAULT_BASE_URL.to_string(),
            context_budget: DEFAULT_CONTEXT_BUDGET,
            timeout: None,
        }
    }
}

impl RelayConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env_string_opt("SESSION_RELAY_URL").unwrap_or(defaults.base_url),
            context_budget: env_u64("SESSION_RELAY_CONTEXT_BUDGET")
                .unwrap_or(defaults.context_budget),
            timeout: env_u64("SESSION_RELAY_TIMEOUT_SECS").map(Duration::from_secs),
        }
    }

    pub fn stream_config(&self) -> StreamConfig {
        let mut config = StreamConfig::new(self.base_url.clone());
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        config
    }
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

fn env_u64(key: &str) -> Option<u64> {
    env_string_opt(key).and_then(|value| value.trim().parse().ok())
}
