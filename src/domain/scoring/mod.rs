//! Scoring domain - lexicon text scoring, quantitative field fusion, hybrid
//! fusion, grading and explainability.
//!
//! Everything in this module is pure: no I/O, no clocks, no randomness.

mod explainability;
mod grade;
mod hybrid;
mod lexicon;
mod quant_fusion;
mod quantitative;
mod text_overall;
mod text_scorer;

pub use explainability::{
    remediation_for, ExplainabilityRanker, ExplainabilityReport, Factor, FactorSource,
    MAX_FACTORS, QUANTITATIVE_FACTOR,
};
pub use grade::{OkGrade, GRADE_BREAKPOINTS};
pub use hybrid::{AnalysisMode, FusionWeights, HybridFusionEngine, HybridResult};
pub use lexicon::{DimensionConfig, DimensionLexicon, LexiconError, DIMENSION_COUNT};
pub use quant_fusion::{DataQualityTier, QuantitativeFusion, QuantitativeResult};
pub use quantitative::{
    classify_column, normalize, FieldCategory, QuantitativeFieldExtractor, QuantitativeSignal,
};
pub use text_overall::{OverallTextScorer, TextScore};
pub use text_scorer::{is_null_like, DimensionScore, TextDimensionScorer, MAX_EVIDENCE, NEUTRAL_SCORE};
