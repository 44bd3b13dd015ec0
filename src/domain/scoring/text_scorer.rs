//! Text dimension scorer - deterministic lexicon matching for one dimension.

use serde::{Deserialize, Serialize};

use super::lexicon::DimensionConfig;

/// Maximum number of matched keywords retained as evidence per polarity.
pub const MAX_EVIDENCE: usize = 5;

/// Score assigned to empty or null-like text.
pub const NEUTRAL_SCORE: f64 = 50.0;

const NULL_LIKE: &[&str] = &["", "nan", "null", "none"];

/// Result of scoring one opinion against one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub dimension_id: String,
    /// Always within [10, 100].
    pub score: f64,
    /// Always within [0, 100].
    pub confidence: f64,
    pub positive_hits: u32,
    pub negative_hits: u32,
    /// Matched positive keywords in lexicon order (at most [`MAX_EVIDENCE`]).
    pub positive_evidence: Vec<String>,
    /// Matched negative keywords in lexicon order (at most [`MAX_EVIDENCE`]).
    pub negative_evidence: Vec<String>,
}

impl DimensionScore {
    /// Neutral score used when the opinion carries no text.
    pub fn neutral(dimension_id: impl Into<String>) -> Self {
        Self {
            dimension_id: dimension_id.into(),
            score: NEUTRAL_SCORE,
            confidence: 0.0,
            positive_hits: 0,
            negative_hits: 0,
            positive_evidence: Vec::new(),
            negative_evidence: Vec::new(),
        }
    }
}

/// Returns true for empty text and the literal placeholders "nan", "null", "none".
pub fn is_null_like(text: &str) -> bool {
    let trimmed = text.trim().to_lowercase();
    NULL_LIKE.contains(&trimmed.as_str())
}

/// Scores opinion text for a single dimension.
pub struct TextDimensionScorer;

impl TextDimensionScorer {
    pub fn score(text: &str, dimension: &DimensionConfig) -> DimensionScore {
        if is_null_like(text) {
            return DimensionScore::neutral(&dimension.id);
        }

        // Length is measured on the text as submitted, surrounding whitespace included.
        let lowered = text.to_lowercase();
        let (positive_hits, positive_evidence) = count_matches(&lowered, &dimension.positive_keywords);
        let (negative_hits, negative_evidence) = count_matches(&lowered, &dimension.negative_keywords);

        let length = text.chars().count() as f64;
        let length_bonus = if length > 50.0 {
            ((length - 50.0) * 5.0 / 100.0).min(10.0)
        } else {
            0.0
        };

        let raw = NEUTRAL_SCORE + (f64::from(positive_hits) * 8.0).min(45.0)
            - (f64::from(negative_hits) * 10.0).min(40.0)
            + length_bonus;
        let score = raw.clamp(10.0, 100.0);

        let confidence = ((f64::from(positive_hits + negative_hits) * 12.0).min(80.0)
            + (length / 20.0).min(20.0))
        .clamp(0.0, 100.0);

        DimensionScore {
            dimension_id: dimension.id.clone(),
            score,
            confidence,
            positive_hits,
            negative_hits,
            positive_evidence,
            negative_evidence,
        }
    }
}

/// Counts non-overlapping occurrences of every keyword and keeps the first
/// matched keywords as evidence.
fn count_matches(lowered: &str, keywords: &[String]) -> (u32, Vec<String>) {
    let mut hits = 0u32;
    let mut evidence = Vec::new();

    for keyword in keywords {
        if keyword.is_empty() {
            continue;
        }
        let occurrences = lowered.matches(keyword.as_str()).count() as u32;
        if occurrences > 0 {
            hits = hits.saturating_add(occurrences);
            if evidence.len() < MAX_EVIDENCE {
                evidence.push(keyword.clone());
            }
        }
    }

    (hits, evidence)
}
