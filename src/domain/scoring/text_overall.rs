//! Overall text scorer - weighted combination of the dimension scores.

use serde::{Deserialize, Serialize};

use super::grade::OkGrade;
use super::lexicon::DimensionLexicon;
use super::text_scorer::{DimensionScore, TextDimensionScorer, NEUTRAL_SCORE};

/// Text-derived score across all dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextScore {
    pub score: f64,
    pub confidence: f64,
    pub grade: OkGrade,
    pub dimensions: Vec<DimensionScore>,
}

impl TextScore {
    pub fn dimension(&self, id: &str) -> Option<&DimensionScore> {
        self.dimensions.iter().find(|d| d.dimension_id == id)
    }
}

pub struct OverallTextScorer;

impl OverallTextScorer {
    /// Scores the opinion against every dimension of the lexicon and combines them.
    pub fn score(text: &str, lexicon: &DimensionLexicon) -> TextScore {
        let dimensions = lexicon
            .dimensions()
            .iter()
            .map(|dimension| TextDimensionScorer::score(text, dimension))
            .collect();
        Self::combine(dimensions, lexicon)
    }

    /// Weighted average of the given dimension scores.
    ///
    /// Weights are renormalized over the dimensions actually present, so a
    /// missing dimension does not drag the score toward zero. Scores for ids the
    /// lexicon does not know are ignored.
    pub fn combine(dimensions: Vec<DimensionScore>, lexicon: &DimensionLexicon) -> TextScore {
        let mut weight_total = 0.0;
        let mut score_sum = 0.0;
        let mut confidence_sum = 0.0;

        for dimension in &dimensions {
            if let Some(weight) = lexicon.weight_of(&dimension.dimension_id) {
                weight_total += weight;
                score_sum += dimension.score * weight;
                confidence_sum += dimension.confidence * weight;
            }
        }

        let (score, confidence) = if weight_total > 0.0 {
            (score_sum / weight_total, confidence_sum / weight_total)
        } else {
            (NEUTRAL_SCORE, 0.0)
        };

        TextScore {
            score,
            confidence,
            grade: OkGrade::from_score(score),
            dimensions,
        }
    }
}
