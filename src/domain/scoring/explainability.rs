//! Explainability - ranks the factors that pushed a score up or down and
//! attaches remediation suggestions to the weak ones.

use serde::{Deserialize, Serialize};

use super::hybrid::HybridResult;
use super::lexicon::DimensionLexicon;

/// Factors and suggestions kept per report.
pub const MAX_FACTORS: usize = 3;
/// Evidence keywords kept per factor.
pub const MAX_FACTOR_EVIDENCE: usize = 3;

pub const STRENGTH_THRESHOLD: f64 = 80.0;
pub const WEAKNESS_THRESHOLD: f64 = 60.0;

/// Factor name used for the quantitative contribution.
pub const QUANTITATIVE_FACTOR: &str = "quantitative_metrics";

const GENERIC_SUGGESTION: &str = "관련 역량에 대한 구체적인 개선 목표를 설정하고 정기적으로 피드백을 받으세요.";

const REMEDIATIONS: &[(&str, &str)] = &[
    ("leadership", "작은 프로젝트라도 주도적으로 맡아 의사결정 경험을 쌓으세요."),
    ("communication", "회의 후 핵심 내용을 정리해 공유하고 적극적으로 경청하는 습관을 기르세요."),
    ("expertise", "직무 관련 교육과 자격 과정을 통해 전문 지식을 체계적으로 보강하세요."),
    ("teamwork", "팀 공동 목표에 기여할 수 있는 협업 과제에 적극적으로 참여하세요."),
    ("responsibility", "업무 일정과 약속을 체계적으로 관리하고 진행 상황을 먼저 공유하세요."),
    ("innovation", "업무 개선 아이디어를 정기적으로 제안하고 작은 실험부터 시도해 보세요."),
    ("problem_solving", "문제 발생 시 원인 분석과 대안 검토 과정을 문서화하는 연습을 하세요."),
    ("growth", "분기별 학습 목표를 세우고 새로운 업무에 도전하는 기회를 만드세요."),
    (QUANTITATIVE_FACTOR, "정량 성과 지표를 점검하고 목표 대비 부족한 항목부터 개선 계획을 세우세요."),
];

/// Looks up the remediation sentence for a factor, falling back to a generic one.
pub fn remediation_for(factor: &str) -> &'static str {
    REMEDIATIONS
        .iter()
        .find(|(name, _)| *name == factor)
        .map(|(_, suggestion)| *suggestion)
        .unwrap_or(GENERIC_SUGGESTION)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorSource {
    Dimension,
    Quantitative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub name: String,
    pub label: String,
    pub source: FactorSource,
    pub score: f64,
    pub impact: f64,
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplainabilityReport {
    pub positive_factors: Vec<Factor>,
    pub negative_factors: Vec<Factor>,
    pub improvement_suggestions: Vec<String>,
}

pub struct ExplainabilityRanker;

impl ExplainabilityRanker {
    pub fn explain(result: &HybridResult, lexicon: &DimensionLexicon) -> ExplainabilityReport {
        let mut positives = Vec::new();
        let mut negatives = Vec::new();
        let text_weight = result.weights.text;

        for dimension in &result.text.dimensions {
            let Some(config) = lexicon.get(&dimension.dimension_id) else {
                continue;
            };

            if dimension.score >= STRENGTH_THRESHOLD {
                positives.push(Factor {
                    name: config.id.clone(),
                    label: config.label.clone(),
                    source: FactorSource::Dimension,
                    score: dimension.score,
                    impact: dimension.score * config.weight * text_weight,
                    evidence: take_evidence(&dimension.positive_evidence),
                });
            } else if dimension.score < WEAKNESS_THRESHOLD {
                negatives.push(Factor {
                    name: config.id.clone(),
                    label: config.label.clone(),
                    source: FactorSource::Dimension,
                    score: dimension.score,
                    impact: (100.0 - dimension.score) * config.weight * text_weight,
                    evidence: take_evidence(&dimension.negative_evidence),
                });
            }
        }

        let quant = &result.quantitative;
        if quant.has_data() {
            let evidence: Vec<String> = quant
                .signals
                .iter()
                .take(MAX_FACTOR_EVIDENCE)
                .map(|s| s.column.clone())
                .collect();
            let quant_factor = |impact: f64| Factor {
                name: QUANTITATIVE_FACTOR.to_string(),
                label: "정량 지표".to_string(),
                source: FactorSource::Quantitative,
                score: quant.score,
                impact,
                evidence: evidence.clone(),
            };

            if quant.score >= STRENGTH_THRESHOLD {
                positives.push(quant_factor(quant.score * result.weights.quant));
            } else if quant.score < WEAKNESS_THRESHOLD {
                negatives.push(quant_factor((100.0 - quant.score) * result.weights.quant));
            }
        }

        let positive_factors = rank(positives);
        let negative_factors = rank(negatives);
        let improvement_suggestions = negative_factors
            .iter()
            .map(|factor| remediation_for(&factor.name).to_string())
            .fold(Vec::new(), |mut acc, suggestion| {
                if !acc.contains(&suggestion) {
                    acc.push(suggestion);
                }
                acc
            });

        ExplainabilityReport {
            positive_factors,
            negative_factors,
            improvement_suggestions,
        }
    }
}

fn take_evidence(evidence: &[String]) -> Vec<String> {
    evidence.iter().take(MAX_FACTOR_EVIDENCE).cloned().collect()
}

/// Drops zero-impact factors, sorts by impact descending and keeps the top few.
/// The sort is stable so ties keep lexicon order.
fn rank(mut factors: Vec<Factor>) -> Vec<Factor> {
    factors.retain(|f| f.impact > 0.0);
    factors.sort_by(|a, b| b.impact.total_cmp(&a.impact));
    factors.truncate(MAX_FACTORS);
    factors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scoring::grade::OkGrade;
    use crate::domain::scoring::hybrid::{AnalysisMode, HybridFusionEngine};
    use crate::domain::scoring::quant_fusion::{QuantitativeFusion, QuantitativeResult};
    use crate::domain::scoring::quantitative::{FieldCategory, QuantitativeSignal};
    use crate::domain::scoring::text_overall::{OverallTextScorer, TextScore};
    use crate::domain::scoring::text_scorer::DimensionScore;

    fn dim(id: &str, score: f64, pos: &[&str], neg: &[&str]) -> DimensionScore {
        DimensionScore {
            dimension_id: id.to_string(),
            score,
            confidence: 30.0,
            positive_hits: pos.len() as u32,
            negative_hits: neg.len() as u32,
            positive_evidence: pos.iter().map(|s| s.to_string()).collect(),
            negative_evidence: neg.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn hybrid(dimensions: Vec<DimensionScore>, quant: QuantitativeResult) -> HybridResult {
        let lexicon = DimensionLexicon::builtin();
        let text: TextScore = OverallTextScorer::combine(dimensions, lexicon);
        HybridFusionEngine::fuse(AnalysisMode::Hybrid, text, quant)
    }

    #[test]
    fn strong_and_weak_dimensions_become_factors() {
        let result = hybrid(
            vec![
                dim("leadership", 90.0, &["리더십", "주도적", "비전", "솔선"], &[]),
                dim("growth", 85.0, &["성장"], &[]),
                dim("communication", 40.0, &[], &["불통", "일방적"]),
                dim("expertise", 70.0, &["지식"], &["실수"]),
            ],
            QuantitativeResult::empty(),
        );

        let report = ExplainabilityRanker::explain(&result, DimensionLexicon::builtin());

        assert_eq!(report.positive_factors.len(), 2);
        assert_eq!(report.positive_factors[0].name, "leadership");
        // 90 * 0.15 * 0.8
        assert!((report.positive_factors[0].impact - 10.8).abs() < 1e-9);
        assert_eq!(report.positive_factors[0].evidence, vec!["리더십", "주도적", "비전"]);
        assert_eq!(report.positive_factors[1].name, "growth");

        assert_eq!(report.negative_factors.len(), 1);
        assert_eq!(report.negative_factors[0].name, "communication");
        assert!((report.negative_factors[0].impact - 60.0 * 0.15 * 0.8).abs() < 1e-9);
        assert_eq!(report.improvement_suggestions, vec![remediation_for("communication")]);
    }

    #[test]
    fn factors_are_capped_at_three_and_sorted_by_impact() {
        let result = hybrid(
            vec![
                dim("responsibility", 30.0, &[], &["지각"]),
                dim("leadership", 50.0, &[], &[]),
                dim("innovation", 20.0, &[], &["관성"]),
                dim("teamwork", 45.0, &[], &["갈등"]),
                dim("growth", 55.0, &[], &[]),
            ],
            QuantitativeResult::empty(),
        );

        let report = ExplainabilityRanker::explain(&result, DimensionLexicon::builtin());
        let names: Vec<&str> = report.negative_factors.iter().map(|f| f.name.as_str()).collect();

        // before text weight: teamwork 55*0.15, innovation 80*0.10, leadership 50*0.15
        assert_eq!(names, vec!["teamwork", "innovation", "leadership"]);
        assert_eq!(report.improvement_suggestions.len(), 3);
    }

    #[test]
    fn quantitative_factor_uses_quant_weight_and_columns() {
        let quant = QuantitativeFusion::fuse(vec![QuantitativeSignal {
            column: "인사등급".to_string(),
            category: FieldCategory::Grade,
            raw: Some("OK★★★".to_string()),
            value: 95.0,
        }]);
        let result = hybrid(vec![], quant);

        let report = ExplainabilityRanker::explain(&result, DimensionLexicon::builtin());

        assert_eq!(report.positive_factors.len(), 1);
        let factor = &report.positive_factors[0];
        assert_eq!(factor.source, FactorSource::Quantitative);
        assert!((factor.impact - 95.0 * 0.3).abs() < 1e-9);
        assert_eq!(factor.evidence, vec!["인사등급"]);
    }

    #[test]
    fn empty_text_reports_neutral_dimensions_as_weaknesses() {
        let lexicon = DimensionLexicon::builtin();
        let text = OverallTextScorer::score("", lexicon);
        let result = HybridFusionEngine::fuse(AnalysisMode::Hybrid, text, QuantitativeResult::empty());

        let report = ExplainabilityRanker::explain(&result, lexicon);

        assert!(report.positive_factors.is_empty());
        let names: Vec<&str> = report.negative_factors.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["leadership", "communication", "expertise"]);
        for factor in &report.negative_factors {
            assert_eq!(factor.score, 50.0);
            // 50 * 0.15 * 0.8
            assert!((factor.impact - 6.0).abs() < 1e-9);
            assert!(factor.evidence.is_empty());
        }
        assert_eq!(
            report.improvement_suggestions,
            vec![
                remediation_for("leadership"),
                remediation_for("communication"),
                remediation_for("expertise"),
            ]
        );
        assert_eq!(result.grade, OkGrade::D);
    }

    #[test]
    fn data_only_mode_omits_dimension_factors() {
        let lexicon = DimensionLexicon::builtin();
        let text = OverallTextScorer::combine(vec![dim("leadership", 95.0, &["리더십"], &[])], lexicon);
        let result = HybridFusionEngine::fuse(AnalysisMode::DataOnly, text, QuantitativeResult::empty());

        let report = ExplainabilityRanker::explain(&result, lexicon);
        assert!(report.positive_factors.is_empty());
    }

    #[test]
    fn unmapped_factor_gets_generic_suggestion() {
        assert_eq!(remediation_for("unknown_dimension"), GENERIC_SUGGESTION);
        assert_ne!(remediation_for("teamwork"), GENERIC_SUGGESTION);
    }
}
