//! HTTP DTOs for analysis job endpoints.
//!
//! Requests use camelCase. Record rows reuse the flat `RecordView` projection
//! so exporters and the API share one shape.

use serde::{Deserialize, Serialize};

use crate::application::handlers::analysis::{JobResults, JobStatusView};
use crate::domain::analysis::RecordView;
use crate::domain::foundation::DomainError;
use crate::domain::job::{JobParams, JobStatus};
use crate::domain::scoring::AnalysisMode;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to submit an analysis job.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobRequest {
    pub source_ref: String,
    #[serde(default)]
    pub sample_size: Option<usize>,
    #[serde(default)]
    pub analysis_mode: Option<String>,
    #[serde(default)]
    pub enrichment_enabled: Option<bool>,
    #[serde(default)]
    pub enrichment_params: Option<EnrichmentParamsRequest>,
    #[serde(default)]
    pub uid_column: Option<String>,
    #[serde(default)]
    pub opinion_column: Option<String>,
}

/// Optional enrichment overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentParamsRequest {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub language: Option<String>,
}

impl SubmitJobRequest {
    /// Layers the request over server defaults.
    pub fn into_params(self, defaults: &JobParams) -> Result<JobParams, String> {
        let analysis_mode = match self.analysis_mode.as_deref() {
            Some(mode) => mode.parse::<AnalysisMode>()?,
            None => defaults.analysis_mode,
        };

        let mut enrichment = defaults.enrichment.clone();
        if let Some(overrides) = self.enrichment_params {
            if overrides.model.is_some() {
                enrichment.model = overrides.model;
            }
            if let Some(temperature) = overrides.temperature {
                enrichment.temperature = temperature;
            }
            if let Some(max_tokens) = overrides.max_tokens {
                enrichment.max_tokens = max_tokens;
            }
            if let Some(language) = overrides.language {
                enrichment.language = language;
            }
        }

        Ok(JobParams {
            analysis_mode,
            sample_size: self.sample_size.or(defaults.sample_size),
            enrichment_enabled: self.enrichment_enabled.unwrap_or(defaults.enrichment_enabled),
            enrichment,
            uid_column: self.uid_column.or_else(|| defaults.uid_column.clone()),
            opinion_column: self.opinion_column.or_else(|| defaults.opinion_column.clone()),
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Response for a submitted job.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobResponse {
    pub job_id: String,
    pub status: JobStatus,
}

/// Job progress.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResponse {
    pub job_id: String,
    pub source_ref: String,
    pub status: JobStatus,
    pub progress: f64,
    pub processed: usize,
    pub failed_rows: usize,
    pub total: usize,
    pub average_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
}

impl From<JobStatusView> for JobStatusResponse {
    fn from(view: JobStatusView) -> Self {
        Self {
            job_id: view.job_id.to_string(),
            source_ref: view.source_ref,
            status: view.status,
            progress: round1(view.progress),
            processed: view.processed,
            failed_rows: view.failed_rows,
            total: view.total,
            average_score: round1(view.average_score),
            error: view.error,
            created_at: view.created_at.as_datetime().to_rfc3339(),
            ended_at: view.ended_at.map(|t| t.as_datetime().to_rfc3339()),
        }
    }
}

/// Records of a job.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResultsResponse {
    pub job_id: String,
    pub status: JobStatus,
    pub count: usize,
    pub records: Vec<RecordView>,
}

impl From<JobResults> for JobResultsResponse {
    fn from(results: JobResults) -> Self {
        let records = results.views();
        Self {
            job_id: results.job.id().to_string(),
            status: results.job.status(),
            count: records.len(),
            records,
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<&DomainError> for ErrorResponse {
    fn from(error: &DomainError) -> Self {
        let details = (!error.details.is_empty())
            .then(|| serde_json::to_value(&error.details).ok())
            .flatten();
        Self {
            code: error.code.to_string(),
            message: error.message.clone(),
            details,
        }
    }
}
