//! RecordAnalysisPipeline - scores a single dataset row.
//!
//! Flow per row:
//! 1. Shape check against the header width
//! 2. Text scoring over the opinion cell
//! 3. Quantitative extraction over the remaining columns (skipped in text-only mode)
//! 4. Hybrid fusion and explainability
//! 5. Optional LLM enrichment, bounded by a deadline and never fatal
//!
//! Steps 1-4 are pure. The analysis timestamp is supplied by the caller so
//! that identical rows always produce identical records.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::analysis::{
    AnalysisRecord, ColumnRoles, DatasetRow, EnrichmentFailure, EnrichmentFailureCode,
    EnrichmentFeedback, RowAnalysisError,
};
use crate::domain::foundation::{JobId, Timestamp};
use crate::domain::job::JobParams;
use crate::domain::scoring::{
    DimensionLexicon, ExplainabilityRanker, ExplainabilityReport, HybridFusionEngine,
    OverallTextScorer, QuantitativeFieldExtractor, QuantitativeFusion, QuantitativeResult,
};
use crate::ports::{FeedbackProvider, FeedbackRequest};

/// Default overall deadline for one enrichment call, retries included.
pub const DEFAULT_ENRICHMENT_DEADLINE: Duration = Duration::from_secs(90);

/// Everything a row needs from its job.
#[derive(Debug, Clone, Copy)]
pub struct RowContext<'a> {
    pub job_id: JobId,
    pub headers: &'a [String],
    pub roles: ColumnRoles,
    pub params: &'a JobParams,
}

/// Scores rows and attaches enrichment feedback.
pub struct RecordAnalysisPipeline {
    lexicon: Arc<DimensionLexicon>,
    feedback_provider: Option<Arc<dyn FeedbackProvider>>,
    enrichment_deadline: Duration,
}

impl RecordAnalysisPipeline {
    pub fn new(lexicon: Arc<DimensionLexicon>) -> Self {
        Self {
            lexicon,
            feedback_provider: None,
            enrichment_deadline: DEFAULT_ENRICHMENT_DEADLINE,
        }
    }

    pub fn with_feedback_provider(mut self, provider: Arc<dyn FeedbackProvider>) -> Self {
        self.feedback_provider = Some(provider);
        self
    }

    pub fn with_enrichment_deadline(mut self, deadline: Duration) -> Self {
        self.enrichment_deadline = deadline;
        self
    }

    pub fn lexicon(&self) -> &DimensionLexicon {
        &self.lexicon
    }

    /// Analyzes one row into a record.
    ///
    /// Enrichment problems degrade to fallback feedback; only shape and
    /// numeric errors are returned.
    pub async fn analyze(
        &self,
        ctx: RowContext<'_>,
        row: &DatasetRow,
        analyzed_at: Timestamp,
    ) -> Result<AnalysisRecord, RowAnalysisError> {
        let mut record = self.score_row(ctx, row, analyzed_at)?;

        if ctx.params.enrichment_enabled {
            record.feedback = Some(self.enrich(ctx.params, &record).await);
        }

        Ok(record)
    }

    /// Deterministic scoring of a row, without enrichment.
    pub fn score_row(
        &self,
        ctx: RowContext<'_>,
        row: &DatasetRow,
        analyzed_at: Timestamp,
    ) -> Result<AnalysisRecord, RowAnalysisError> {
        // 1. Shape
        if row.width() != ctx.headers.len() {
            return Err(RowAnalysisError::MalformedRow {
                row: row.index,
                expected: ctx.headers.len(),
                actual: row.width(),
            });
        }

        let uid = row
            .get(ctx.roles.uid)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("row-{}", row.index + 1));
        let opinion = row.get(ctx.roles.opinion).unwrap_or_default().to_string();

        // 2. Text
        let text = OverallTextScorer::score(&opinion, &self.lexicon);

        // 3. Quantitative
        let quantitative = self.quantitative(ctx, row);

        // 4. Fusion + explanation
        let result = HybridFusionEngine::fuse(ctx.params.analysis_mode, text, quantitative);
        if !result.overall_score.is_finite() || !result.confidence.is_finite() {
            return Err(RowAnalysisError::NonFiniteScore { row: row.index });
        }
        let explanation = ExplainabilityRanker::explain(&result, &self.lexicon);

        Ok(AnalysisRecord {
            job_id: ctx.job_id,
            row_index: row.index,
            uid,
            opinion,
            result,
            explanation,
            feedback: None,
            analyzed_at,
        })
    }

    fn quantitative(&self, ctx: RowContext<'_>, row: &DatasetRow) -> QuantitativeResult {
        if !ctx.params.analysis_mode.uses_quantitative() {
            return QuantitativeResult::empty();
        }

        let cells = ctx
            .headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| ctx.roles.is_data_column(*idx))
            .map(|(idx, header)| (header.as_str(), row.get(idx)));

        QuantitativeFusion::fuse(QuantitativeFieldExtractor::extract(cells))
    }

    async fn enrich(&self, params: &JobParams, record: &AnalysisRecord) -> EnrichmentFeedback {
        let Some(provider) = self.feedback_provider.as_ref() else {
            return EnrichmentFeedback::fallback(EnrichmentFailure::new(
                EnrichmentFailureCode::NotConfigured,
                "enrichment requested but no feedback provider is configured",
            ));
        };

        let request = build_request(params, record);

        match tokio::time::timeout(self.enrichment_deadline, provider.generate_feedback(request)).await {
            Ok(Ok(response)) => {
                debug!(row = record.row_index, provider = %response.provider, "enrichment succeeded");
                EnrichmentFeedback {
                    summary: response.summary,
                    strengths: response.strengths,
                    improvements: response.improvements,
                    provider: Some(response.provider),
                    model: Some(response.model),
                    error: None,
                }
            }
            Ok(Err(err)) => {
                warn!(row = record.row_index, error = %err, "enrichment failed, using fallback");
                EnrichmentFeedback::fallback(err.to_failure())
            }
            Err(_) => {
                warn!(
                    row = record.row_index,
                    deadline_ms = self.enrichment_deadline.as_millis() as u64,
                    "enrichment deadline exceeded, using fallback"
                );
                EnrichmentFeedback::fallback(EnrichmentFailure::new(
                    EnrichmentFailureCode::Timeout,
                    format!(
                        "enrichment did not finish within {}ms",
                        self.enrichment_deadline.as_millis()
                    ),
                ))
            }
        }
    }
}

fn build_request(params: &JobParams, record: &AnalysisRecord) -> FeedbackRequest {
    FeedbackRequest {
        uid: record.uid.clone(),
        opinion: record.opinion.clone(),
        overall_score: record.result.overall_score,
        grade: record.result.grade,
        strengths: factor_labels(&record.explanation, true),
        weaknesses: factor_labels(&record.explanation, false),
        params: params.enrichment.clone(),
    }
}

fn factor_labels(report: &ExplainabilityReport, positive: bool) -> Vec<String> {
    let factors = if positive {
        &report.positive_factors
    } else {
        &report.negative_factors
    };
    factors.iter().map(|f| f.label.clone()).collect()
}
