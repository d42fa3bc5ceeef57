//! Generative model configuration.

use serde::{Deserialize, Serialize};

fn default_endpoint() -> String {
    String::from("https://generativelanguage.googleapis.com")
}

fn default_model() -> String {
    String::from("gemini-1.5-flash")
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_temperature() -> f32 {
    0.7
}

const fn default_max_output_tokens() -> u32 {
    4096
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_base_delay_ms() -> u64 {
    1000
}

const fn default_max_delay_ms() -> u64 {
    10_000
}

/// Backoff settings for rate-limited model calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrySettings {
    /// Retries after the initial attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Wait before the first retry; doubles for each subsequent retry.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Upper bound on any single wait.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AiConfig {
    /// API key for the generative language endpoint.
    #[serde(default)]
    pub api_key: String,

    /// Model name, e.g. `gemini-1.5-flash`.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the generative language API.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default)]
    pub retry: RetrySettings,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            retry: RetrySettings::default(),
        }
    }
}

impl AiConfig {
    /// A model call is only attempted when an API key is present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.model.is_empty()
    }
}
