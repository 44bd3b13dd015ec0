//! Analysis records - the per-row output of the pipeline - and their flat
//! export view.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{JobId, Timestamp};
use crate::domain::scoring::{ExplainabilityReport, HybridResult};

/// Summary text used whenever enrichment could not produce feedback.
pub const FALLBACK_SUMMARY: &str =
    "AI 피드백을 생성하지 못했습니다. 정량/정성 분석 결과를 참고해 주세요.";

/// Machine-readable reason an enrichment call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrichmentFailureCode {
    Timeout,
    RateLimited,
    Unavailable,
    AuthenticationFailed,
    InvalidResponse,
    Network,
    InvalidRequest,
    NotConfigured,
}

impl EnrichmentFailureCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrichmentFailureCode::Timeout => "TIMEOUT",
            EnrichmentFailureCode::RateLimited => "RATE_LIMITED",
            EnrichmentFailureCode::Unavailable => "UNAVAILABLE",
            EnrichmentFailureCode::AuthenticationFailed => "AUTHENTICATION_FAILED",
            EnrichmentFailureCode::InvalidResponse => "INVALID_RESPONSE",
            EnrichmentFailureCode::Network => "NETWORK",
            EnrichmentFailureCode::InvalidRequest => "INVALID_REQUEST",
            EnrichmentFailureCode::NotConfigured => "NOT_CONFIGURED",
        }
    }
}

impl fmt::Display for EnrichmentFailureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured enrichment failure recorded on a fallback feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentFailure {
    pub code: EnrichmentFailureCode,
    pub message: String,
}

impl EnrichmentFailure {
    pub fn new(code: EnrichmentFailureCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// LLM-generated narrative feedback, or the fixed fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentFeedback {
    pub summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub provider: Option<String>,
    pub model: Option<String>,
    /// Present only on fallback feedback.
    pub error: Option<EnrichmentFailure>,
}

impl EnrichmentFeedback {
    pub fn fallback(failure: EnrichmentFailure) -> Self {
        Self {
            summary: FALLBACK_SUMMARY.to_string(),
            strengths: Vec::new(),
            improvements: Vec::new(),
            provider: None,
            model: None,
            error: Some(failure),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

/// Result of analysing a single dataset row. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub job_id: JobId,
    /// Zero-based index of the source row.
    pub row_index: usize,
    pub uid: String,
    pub opinion: String,
    pub result: HybridResult,
    pub explanation: ExplainabilityReport,
    pub feedback: Option<EnrichmentFeedback>,
    pub analyzed_at: Timestamp,
}

impl AnalysisRecord {
    pub fn overall_score(&self) -> f64 {
        self.result.overall_score
    }

    pub fn view(&self) -> RecordView {
        RecordView::from(self)
    }
}

/// Flat, export-friendly projection of an [`AnalysisRecord`].
///
/// Scores are rounded to one decimal. Dimension scores are flattened into
/// `dim_<id>` fields, ordered by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordView {
    pub row_index: usize,
    pub uid: String,
    pub opinion: String,
    pub overall_score: f64,
    pub grade: String,
    pub grade_description: String,
    pub percentile: String,
    pub confidence: f64,
    pub text_score: f64,
    pub quant_score: f64,
    pub text_weight: f64,
    pub quant_weight: f64,
    pub data_quality: String,
    pub top_strength: Option<String>,
    pub top_weakness: Option<String>,
    pub suggestions: String,
    pub feedback_summary: Option<String>,
    pub enrichment_error: Option<String>,
    #[serde(flatten)]
    pub dimensions: BTreeMap<String, f64>,
}

impl From<&AnalysisRecord> for RecordView {
    fn from(record: &AnalysisRecord) -> Self {
        let result = &record.result;
        let dimensions = result
            .text
            .dimensions
            .iter()
            .map(|d| (format!("dim_{}", d.dimension_id), round1(d.score)))
            .collect();

        Self {
            row_index: record.row_index,
            uid: record.uid.clone(),
            opinion: record.opinion.clone(),
            overall_score: round1(result.overall_score),
            grade: result.grade.symbol().to_string(),
            grade_description: result.grade_description.clone(),
            percentile: result.percentile_label.clone(),
            confidence: round1(result.confidence),
            text_score: round1(result.text.score),
            quant_score: round1(result.quantitative.score),
            text_weight: result.weights.text,
            quant_weight: result.weights.quant,
            data_quality: result.quantitative.quality.as_str().to_string(),
            top_strength: record.explanation.positive_factors.first().map(|f| f.label.clone()),
            top_weakness: record.explanation.negative_factors.first().map(|f| f.label.clone()),
            suggestions: record.explanation.improvement_suggestions.join(" | "),
            feedback_summary: record.feedback.as_ref().map(|f| f.summary.clone()),
            enrichment_error: record
                .feedback
                .as_ref()
                .and_then(|f| f.error.as_ref())
                .map(|e| e.code.to_string()),
            dimensions,
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scoring::{
        AnalysisMode, DimensionLexicon, ExplainabilityRanker, HybridFusionEngine,
        OverallTextScorer, QuantitativeResult,
    };

    fn record(feedback: Option<EnrichmentFeedback>) -> AnalysisRecord {
        let lexicon = DimensionLexicon::builtin();
        let text = OverallTextScorer::score("리더십이 뛰어나고 소통을 잘하며 협업에 적극적입니다", lexicon);
        let result = HybridFusionEngine::fuse(AnalysisMode::Hybrid, text, QuantitativeResult::empty());
        let explanation = ExplainabilityRanker::explain(&result, lexicon);
        AnalysisRecord {
            job_id: JobId::new(),
            row_index: 2,
            uid: "E003".to_string(),
            opinion: "리더십이 뛰어나고 소통을 잘하며 협업에 적극적입니다".to_string(),
            result,
            explanation,
            feedback,
            analyzed_at: Timestamp::now(),
        }
    }

    #[test]
    fn view_flattens_record() {
        let record = record(None);
        let view = record.view();

        assert_eq!(view.uid, "E003");
        assert_eq!(view.row_index, 2);
        assert_eq!(view.grade, record.result.grade.symbol());
        assert_eq!(view.data_quality, "none");
        assert_eq!(view.dimensions.len(), 8);
        assert!(view.dimensions.contains_key("dim_leadership"));
        assert_eq!(view.overall_score, (record.overall_score() * 10.0).round() / 10.0);
        assert!(view.enrichment_error.is_none());
    }

    #[test]
    fn view_serializes_dimensions_as_flat_fields() {
        let json = serde_json::to_value(record(None).view()).unwrap();
        assert!(json.get("dim_teamwork").unwrap().is_number());
        assert!(json.get("dimensions").is_none());
    }

    #[test]
    fn fallback_feedback_carries_error_code() {
        let failure = EnrichmentFailure::new(EnrichmentFailureCode::Timeout, "deadline of 60s exceeded");
        let record = record(Some(EnrichmentFeedback::fallback(failure)));

        let feedback = record.feedback.as_ref().unwrap();
        assert!(feedback.is_fallback());
        assert_eq!(feedback.summary, FALLBACK_SUMMARY);
        assert_eq!(record.view().enrichment_error.as_deref(), Some("TIMEOUT"));
    }

    #[test]
    fn round1_rounds_half_away_from_zero() {
        assert_eq!(round1(74.25), 74.3);
        assert_eq!(round1(72.44), 72.4);
        assert_eq!(round1(80.0), 80.0);
    }
}
