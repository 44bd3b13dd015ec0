//! Quantitative fusion - weighted average of normalized field signals.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::quantitative::QuantitativeSignal;
use super::text_scorer::NEUTRAL_SCORE;

/// How much quantitative data a row carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQualityTier {
    None,
    Low,
    Medium,
    High,
}

impl DataQualityTier {
    pub fn from_signal_count(count: usize) -> Self {
        match count {
            0 => DataQualityTier::None,
            1..=2 => DataQualityTier::Low,
            3..=4 => DataQualityTier::Medium,
            _ => DataQualityTier::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataQualityTier::None => "none",
            DataQualityTier::Low => "low",
            DataQualityTier::Medium => "medium",
            DataQualityTier::High => "high",
        }
    }
}

impl fmt::Display for DataQualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantitativeResult {
    pub score: f64,
    pub confidence: f64,
    pub quality: DataQualityTier,
    pub signal_count: usize,
    pub signals: Vec<QuantitativeSignal>,
}

impl QuantitativeResult {
    /// Result for a row with no detected quantitative fields.
    pub fn empty() -> Self {
        Self {
            score: NEUTRAL_SCORE,
            confidence: 0.0,
            quality: DataQualityTier::None,
            signal_count: 0,
            signals: Vec::new(),
        }
    }

    pub fn has_data(&self) -> bool {
        self.quality != DataQualityTier::None
    }
}

pub struct QuantitativeFusion;

impl QuantitativeFusion {
    pub fn fuse(signals: Vec<QuantitativeSignal>) -> QuantitativeResult {
        if signals.is_empty() {
            return QuantitativeResult::empty();
        }

        let weight_total: f64 = signals.iter().map(|s| s.category.weight()).sum();
        let weighted: f64 = signals
            .iter()
            .map(|s| s.value * s.category.weight())
            .sum();

        QuantitativeResult {
            score: (weighted / weight_total).clamp(0.0, 100.0),
            confidence: (weight_total * 20.0).min(100.0),
            quality: DataQualityTier::from_signal_count(signals.len()),
            signal_count: signals.len(),
            signals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scoring::quantitative::FieldCategory;

    fn signal(category: FieldCategory, value: f64) -> QuantitativeSignal {
        QuantitativeSignal {
            column: category.as_str().to_string(),
            category,
            raw: Some(value.to_string()),
            value,
        }
    }

    #[test]
    fn no_fields_is_neutral_with_no_confidence() {
        let result = QuantitativeFusion::fuse(vec![]);
        assert_eq!(result.score, 50.0);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.quality, DataQualityTier::None);
        assert_eq!(result.signal_count, 0);
        assert!(!result.has_data());
    }

    #[test]
    fn single_score_field_is_low_quality() {
        let result = QuantitativeFusion::fuse(vec![signal(FieldCategory::Score, 85.0)]);
        assert_eq!(result.score, 85.0);
        assert!((result.confidence - 6.0).abs() < 1e-9);
        assert_eq!(result.quality, DataQualityTier::Low);
    }

    #[test]
    fn weighted_by_category() {
        let result = QuantitativeFusion::fuse(vec![
            signal(FieldCategory::Grade, 90.0),
            signal(FieldCategory::Count, 30.0),
        ]);
        // (90*0.4 + 30*0.1) / 0.5
        assert!((result.score - 78.0).abs() < 1e-9);
        assert!((result.confidence - 10.0).abs() < 1e-9);
    }

    #[test]
    fn confidence_caps_at_one_hundred() {
        let signals = (0..15).map(|_| signal(FieldCategory::Grade, 70.0)).collect();
        let result = QuantitativeFusion::fuse(signals);
        assert_eq!(result.confidence, 100.0);
        assert_eq!(result.quality, DataQualityTier::High);
    }

    #[test]
    fn quality_tiers() {
        assert_eq!(DataQualityTier::from_signal_count(0), DataQualityTier::None);
        assert_eq!(DataQualityTier::from_signal_count(2), DataQualityTier::Low);
        assert_eq!(DataQualityTier::from_signal_count(3), DataQualityTier::Medium);
        assert_eq!(DataQualityTier::from_signal_count(4), DataQualityTier::Medium);
        assert_eq!(DataQualityTier::from_signal_count(5), DataQualityTier::High);
    }
}
