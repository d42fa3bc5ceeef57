//! Retry-then-fallback around a generative model call.
//!
//! Rate-limited calls are retried with capped exponential backoff. Any other
//! failure, or exhausting the retries, or output the caller cannot parse,
//! yields the caller's fallback value instead of an error. The result is an
//! [`Outcome`] so callers can still tell which path produced the value.

use std::time::Duration;

use wp_config::RetrySettings;

use crate::error::AiError;
use crate::model::GenerativeModel;

/// Backoff schedule for rate-limited calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt.
    pub max_retries: u32,
    /// Wait before the first retry.
    pub base_delay: Duration,
    /// Upper bound on any single wait.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetrySettings::default())
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            base_delay: Duration::from_millis(settings.base_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// Wait before retry number `retry` (1-based): `base * 2^(retry-1)`,
    /// capped at `max_delay`.
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Like [`Self::delay_for`], but never shorter than the server's
    /// `Retry-After` hint. Still capped at `max_delay`.
    #[must_use]
    pub fn delay_after(&self, retry: u32, hint: Option<Duration>) -> Duration {
        let delay = self.delay_for(retry);
        hint.map_or(delay, |hint| delay.max(hint).min(self.max_delay))
    }
}

/// A value plus how it was obtained.
#[derive(Debug)]
pub enum Outcome<T> {
    /// The model answered and the answer was usable.
    Generated(T),
    /// The model could not be used; `value` came from the fallback.
    Fallback { value: T, error: AiError },
}

impl<T> Outcome<T> {
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    #[must_use]
    pub const fn value(&self) -> &T {
        match self {
            Self::Generated(value) | Self::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Generated(value) | Self::Fallback { value, .. } => value,
        }
    }
}

/// Call the model, retrying only rate-limit errors per `policy`.
///
/// # Errors
///
/// The last error once retries are exhausted, or the first non-retryable one.
pub async fn generate_with_retry<M: GenerativeModel>(
    model: &M,
    prompt: &str,
    policy: &RetryPolicy,
) -> Result<String, AiError> {
    let mut retry = 0;
    loop {
        match model.generate(prompt).await {
            Ok(text) => return Ok(text),
            Err(e) if e.is_retryable() && retry < policy.max_retries => {
                retry += 1;
                let delay = policy.delay_after(retry, e.retry_after());
                tracing::warn!(
                    model = model.name(),
                    retry,
                    max_retries = policy.max_retries,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "model rate limited, backing off"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Generate, parse, and fall back on any failure.
///
/// `parse` turns model text into `T`; a parse failure is not retried.
/// `fallback` is only invoked when the model path fails.
pub async fn generate_or_fallback<M, T, P, F>(
    model: &M,
    prompt: &str,
    policy: &RetryPolicy,
    parse: P,
    fallback: F,
) -> Outcome<T>
where
    M: GenerativeModel,
    P: FnOnce(&str) -> Result<T, AiError>,
    F: FnOnce() -> T,
{
    let result = match generate_with_retry(model, prompt, policy).await {
        Ok(text) => parse(&text),
        Err(e) => Err(e),
    };
    match result {
        Ok(value) => Outcome::Generated(value),
        Err(error) => {
            if matches!(error, AiError::NotConfigured) {
                tracing::debug!(model = model.name(), "model not configured, using fallback");
            } else {
                tracing::warn!(model = model.name(), %error, "model unavailable, using fallback");
            }
            Outcome::Fallback {
                value: fallback(),
                error,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedModel;
    use pretty_assertions::assert_eq;
    use tokio::time::Instant;

    fn rate_limited() -> AiError {
        AiError::RateLimited { retry_after_secs: None }
    }

    #[test]
    fn default_delays_double_and_cap() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(4));
        assert_eq!(policy.delay_for(4), Duration::from_secs(8));
        assert_eq!(policy.delay_for(5), Duration::from_secs(10));
        assert_eq!(policy.delay_for(40), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn four_rate_limits_wait_seven_seconds_then_fail() {
        let model = ScriptedModel::new([
            Err(rate_limited()),
            Err(rate_limited()),
            Err(rate_limited()),
            Err(rate_limited()),
        ]);
        let start = Instant::now();

        let result = generate_with_retry(&model, "p", &RetryPolicy::default()).await;

        assert!(matches!(result, Err(AiError::RateLimited { .. })));
        assert_eq!(model.calls(), 4);
        let waited = start.elapsed();
        assert!(waited >= Duration::from_secs(7), "waited {waited:?}");
        assert!(waited < Duration::from_secs(8), "waited {waited:?}");
    }

    #[test]
    fn retry_after_hint_is_a_capped_floor() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1, None), Duration::from_secs(1));
        assert_eq!(policy.delay_after(1, Some(Duration::from_secs(3))), Duration::from_secs(3));
        assert_eq!(policy.delay_after(3, Some(Duration::from_secs(2))), Duration::from_secs(4));
        assert_eq!(policy.delay_after(1, Some(Duration::from_secs(60))), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn honours_retry_after_hint() {
        let model = ScriptedModel::new([
            Err(AiError::RateLimited { retry_after_secs: Some(3) }),
            Ok("done".to_string()),
        ]);
        let start = Instant::now();

        let text = generate_with_retry(&model, "p", &RetryPolicy::default()).await.unwrap();

        assert_eq!(text, "done");
        let waited = start.elapsed();
        assert!(waited >= Duration::from_secs(3), "waited {waited:?}");
        assert!(waited < Duration::from_secs(4), "waited {waited:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_a_rate_limit() {
        let model = ScriptedModel::new([Err(rate_limited()), Ok("done".to_string())]);

        let text = generate_with_retry(&model, "p", &RetryPolicy::default()).await.unwrap();

        assert_eq!(text, "done");
        assert_eq!(model.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn other_errors_abort_immediately() {
        let model = ScriptedModel::new([
            Err(AiError::Api {
                status: 500,
                message: "boom".into(),
            }),
            Ok("never".to_string()),
        ]);
        let start = Instant::now();

        let result = generate_with_retry(&model, "p", &RetryPolicy::default()).await;

        assert!(matches!(result, Err(AiError::Api { status: 500, .. })));
        assert_eq!(model.calls(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn parse_failure_falls_back_without_retry() {
        let model = ScriptedModel::new([Ok("not json".to_string())]);

        let outcome = generate_or_fallback(
            &model,
            "p",
            &RetryPolicy::default(),
            |text| text.parse::<u32>().map_err(|e| AiError::Parse(e.to_string())),
            || 7,
        )
        .await;

        assert!(outcome.is_fallback());
        assert_eq!(outcome.into_value(), 7);
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn usable_output_is_generated() {
        let model = ScriptedModel::new([Ok("42".to_string())]);

        let outcome = generate_or_fallback(
            &model,
            "p",
            &RetryPolicy::default(),
            |text| text.parse::<u32>().map_err(|e| AiError::Parse(e.to_string())),
            || unreachable!("fallback must not run"),
        )
        .await;

        assert!(matches!(outcome, Outcome::Generated(42)));
    }
}
