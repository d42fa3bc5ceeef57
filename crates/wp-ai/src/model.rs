//! The generative model seam.

use std::future::Future;
use std::sync::Arc;

use wp_config::AiConfig;

use crate::error::AiError;
use crate::gemini::GeminiClient;

/// A text-in, text-out generative model.
///
/// Errors are either [`AiError::RateLimited`], which callers may retry, or
/// anything else, which they should not.
pub trait GenerativeModel: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, AiError>> + Send;
}

impl<M: GenerativeModel> GenerativeModel for Arc<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, AiError>> + Send {
        (**self).generate(prompt)
    }
}

/// Stand-in used when no API key is configured. Every call fails with
/// [`AiError::NotConfigured`], which sends callers straight to their fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledModel;

impl GenerativeModel for DisabledModel {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, AiError> {
        Err(AiError::NotConfigured)
    }
}

/// The model selected by configuration: Gemini when an API key is set,
/// otherwise [`DisabledModel`].
pub enum ConfiguredModel {
    Gemini(GeminiClient),
    Disabled(DisabledModel),
}

impl ConfiguredModel {
    /// # Errors
    ///
    /// [`AiError::Http`] if a configured client cannot be built.
    pub fn from_config(config: &AiConfig) -> Result<Self, AiError> {
        if !config.is_configured() {
            tracing::info!("no generative model configured, rule-based fallbacks only");
            return Ok(Self::Disabled(DisabledModel));
        }
        Ok(Self::Gemini(GeminiClient::new(config)?))
    }
}

impl GenerativeModel for ConfiguredModel {
    fn name(&self) -> &str {
        match self {
            Self::Gemini(client) => client.name(),
            Self::Disabled(model) => model.name(),
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        match self {
            Self::Gemini(client) => client.generate(prompt).await,
            Self::Disabled(model) => model.generate(prompt).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_selects_disabled_model() {
        let model = ConfiguredModel::from_config(&AiConfig::default()).unwrap();
        assert_eq!(model.name(), "disabled");
        assert!(matches!(model.generate("hi").await, Err(AiError::NotConfigured)));
    }

    #[test]
    fn api_key_selects_gemini() {
        let config = AiConfig {
            api_key: "key".into(),
            ..Default::default()
        };
        let model = ConfiguredModel::from_config(&config).unwrap();
        assert!(matches!(model, ConfiguredModel::Gemini(_)));
        assert_eq!(model.name(), config.model);
    }
}
