//! Typed job parameters.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;
use crate::domain::scoring::AnalysisMode;

pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_MAX_TOKENS: u32 = 800;
pub const MAX_TOKENS_LIMIT: u32 = 4096;

/// Options recognized for an analysis job. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobParams {
    pub analysis_mode: AnalysisMode,
    /// Analyse only the first N rows.
    pub sample_size: Option<usize>,
    pub enrichment_enabled: bool,
    pub enrichment: EnrichmentParams,
    /// Column holding the record identifier; auto-detected when absent.
    pub uid_column: Option<String>,
    /// Column holding the free-text opinion; auto-detected when absent.
    pub opinion_column: Option<String>,
}

impl Default for JobParams {
    fn default() -> Self {
        Self {
            analysis_mode: AnalysisMode::Hybrid,
            sample_size: None,
            enrichment_enabled: false,
            enrichment: EnrichmentParams::default(),
            uid_column: None,
            opinion_column: None,
        }
    }
}

impl JobParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.sample_size == Some(0) {
            return Err(ValidationError::out_of_range("sample_size", 1, i64::MAX, 0));
        }
        if self.enrichment_enabled {
            self.enrichment.validate()?;
        }
        Ok(())
    }
}

/// Per-job options passed to the feedback provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentParams {
    /// Overrides the provider's configured model.
    pub model: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Language of the generated feedback, e.g. "ko" or "en".
    pub language: String,
}

impl Default for EnrichmentParams {
    fn default() -> Self {
        Self {
            model: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            language: "ko".to_string(),
        }
    }
}

impl EnrichmentParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::invalid_format(
                "enrichment.temperature",
                "must be between 0.0 and 2.0",
            ));
        }
        if self.max_tokens == 0 || self.max_tokens > MAX_TOKENS_LIMIT {
            return Err(ValidationError::out_of_range(
                "enrichment.max_tokens",
                1,
                MAX_TOKENS_LIMIT as i64,
                self.max_tokens as i64,
            ));
        }
        if self.language.trim().is_empty() {
            return Err(ValidationError::empty_field("enrichment.language"));
        }
        if matches!(&self.model, Some(model) if model.trim().is_empty()) {
            return Err(ValidationError::empty_field("enrichment.model"));
        }
        Ok(())
    }
}
