//! LLM enrichment configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::ai::OpenAIFeedbackConfig;

/// Feedback provider configuration (OpenAI-compatible chat completions).
///
/// Enrichment is available only when an API key is set; jobs that request it
/// otherwise get fallback feedback.
#[derive(Debug, Clone, Deserialize)]
pub struct EnrichmentConfig {
    /// Provider API key
    pub api_key: Option<Secret<String>>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Per-attempt request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// First retry delay in milliseconds; doubles per attempt
    #[serde(default = "default_backoff_base")]
    pub backoff_base_ms: u64,

    /// Overall deadline per row, retries included
    #[serde(default = "default_deadline")]
    pub deadline_secs: u64,
}

impl EnrichmentConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }

    /// Provider settings, or `None` when no API key is set.
    pub fn provider_config(&self) -> Option<OpenAIFeedbackConfig> {
        if !self.is_configured() {
            return None;
        }
        let api_key = self.api_key.as_ref()?.expose_secret().clone();

        Some(
            OpenAIFeedbackConfig::new(api_key)
                .with_model(self.model.clone())
                .with_base_url(self.base_url.clone())
                .with_timeouts(
                    Duration::from_secs(self.connect_timeout_secs),
                    Duration::from_secs(self.request_timeout_secs),
                )
                .with_retry(self.max_attempts, Duration::from_millis(self.backoff_base_ms)),
        )
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidEnrichmentUrl);
        }
        if self.max_attempts == 0 || self.max_attempts > 10 {
            return Err(ValidationError::InvalidRetryAttempts);
        }
        if self.connect_timeout_secs == 0 || self.request_timeout_secs == 0 || self.deadline_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base(),
            deadline_secs: default_deadline(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    60
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_base() -> u64 {
    1000
}

fn default_deadline() -> u64 {
    // three 60s attempts plus 1s + 2s of backoff
    185
}
