//! Summary Service
//!
//! Builds the prompt for a document and hands it to the configured provider.

use std::sync::Arc;

use super::{
    prompt::{build_prompt, excerpt, EXCERPT_CHAR_LIMIT},
    provider::{GeminiProvider, OpenAiProvider, SummaryProvider},
    types::{Summary, SummaryDetail, SummaryError},
};
use crate::config::{AiConfig, AiProvider};

/// Summarizes document text through a remote completion service
#[derive(Clone)]
pub struct SummaryService {
    provider: Option<Arc<dyn SummaryProvider>>,
}

impl SummaryService {
    /// Create a service around a provider
    pub fn new(provider: Arc<dyn SummaryProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// A service with no provider; every request fails with `NotConfigured`
    pub fn unconfigured() -> Self {
        Self { provider: None }
    }

    pub fn from_config(config: &AiConfig) -> Self {
        let Some(api_key) = config.api_key.as_deref() else {
            tracing::warn!("No AI API key configured; summaries are disabled");
            return Self::unconfigured();
        };

        let provider: Arc<dyn SummaryProvider> = match config.provider {
            AiProvider::Gemini => {
                Arc::new(GeminiProvider::new(&config.base_url, api_key, &config.model))
            }
            AiProvider::OpenAi => {
                Arc::new(OpenAiProvider::new(&config.base_url, api_key, &config.model))
            }
        };

        tracing::info!(
            provider = ?provider.provider_type(),
            model = %provider.model(),
            "AI summaries enabled"
        );

        Self::new(provider)
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Summarize the first `EXCERPT_CHAR_LIMIT` characters of `text`
    pub async fn summarize(&self, text: &str, detail: SummaryDetail) -> Result<Summary, SummaryError> {
        let provider = self.provider.as_ref().ok_or_else(|| {
            SummaryError::NotConfigured("set GEMINI_API_KEY or AI_API_KEY".to_string())
        })?;

        let prompt = build_prompt(text, detail);
        let excerpt_chars = excerpt(text, EXCERPT_CHAR_LIMIT).chars().count();

        tracing::debug!(
            provider = ?provider.provider_type(),
            model = %provider.model(),
            detail = %detail,
            excerpt_chars = excerpt_chars,
            "Requesting summary"
        );

        let text = provider.generate(&prompt).await?;

        Ok(Summary {
            text,
            detail,
            provider: provider.provider_type(),
            model: provider.model().to_string(),
            excerpt_chars,
        })
    }
}
