//! Feedback Provider Port - Interface for LLM feedback enrichment.
//!
//! The pipeline hands a scored record to the provider and receives narrative
//! feedback. Any error degrades to fallback feedback on the record; it never
//! fails the row.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::analysis::{EnrichmentFailure, EnrichmentFailureCode};
use crate::domain::job::EnrichmentParams;
use crate::domain::scoring::OkGrade;

/// Port for narrative feedback generation.
#[async_trait]
pub trait FeedbackProvider: Send + Sync {
    /// Generate feedback for one analysed record.
    async fn generate_feedback(
        &self,
        request: FeedbackRequest,
    ) -> Result<FeedbackResponse, EnrichmentError>;

    /// Get provider information (name, default model).
    fn provider_info(&self) -> ProviderInfo;
}

/// Everything the provider needs to write feedback about one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub uid: String,
    pub opinion: String,
    pub overall_score: f64,
    pub grade: OkGrade,
    /// Labels of the top positive factors.
    pub strengths: Vec<String>,
    /// Labels of the top negative factors.
    pub weaknesses: Vec<String>,
    pub params: EnrichmentParams,
}

/// Feedback returned by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub provider: String,
    pub model: String,
}

/// Provider information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "openai", "mock").
    pub name: String,
    /// Default model identifier.
    pub model: String,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Enrichment errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EnrichmentError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Enrichment was requested but no provider is configured.
    #[error("no feedback provider configured")]
    NotConfigured,
}

impl EnrichmentError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EnrichmentError::RateLimited { .. }
                | EnrichmentError::Unavailable { .. }
                | EnrichmentError::Network(_)
                | EnrichmentError::Timeout { .. }
        )
    }

    pub fn code(&self) -> EnrichmentFailureCode {
        match self {
            EnrichmentError::RateLimited { .. } => EnrichmentFailureCode::RateLimited,
            EnrichmentError::Unavailable { .. } => EnrichmentFailureCode::Unavailable,
            EnrichmentError::AuthenticationFailed => EnrichmentFailureCode::AuthenticationFailed,
            EnrichmentError::Network(_) => EnrichmentFailureCode::Network,
            EnrichmentError::Parse(_) => EnrichmentFailureCode::InvalidResponse,
            EnrichmentError::InvalidRequest(_) => EnrichmentFailureCode::InvalidRequest,
            EnrichmentError::Timeout { .. } => EnrichmentFailureCode::Timeout,
            EnrichmentError::NotConfigured => EnrichmentFailureCode::NotConfigured,
        }
    }

    /// Structured failure stored on fallback feedback.
    pub fn to_failure(&self) -> EnrichmentFailure {
        EnrichmentFailure::new(self.code(), self.to_string())
    }
}
