//! Generative model error types.

use std::time::Duration;

use thiserror::Error;
use wp_core::errors::CoreError;

/// Errors from a generative model call or from interpreting its output.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The API returned 429 Too Many Requests.
    #[error("rate limited")]
    RateLimited {
        /// Server-suggested wait, when the response carried one.
        retry_after_secs: Option<u64>,
    },

    /// The model answered but the text could not be used.
    #[error("parse error: {0}")]
    Parse(String),

    /// No API key is configured, so no call was attempted.
    #[error("generative model is not configured")]
    NotConfigured,
}

impl AiError {
    /// Only rate limiting is worth waiting out.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Server-suggested wait carried by a rate-limit response.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited {
                retry_after_secs: Some(secs),
            } => Some(Duration::from_secs(*secs)),
            _ => None,
        }
    }
}

impl From<AiError> for CoreError {
    fn from(e: AiError) -> Self {
        Self::ExternalService(e.to_string())
    }
}
