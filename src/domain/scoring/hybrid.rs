//! Hybrid fusion of the text and quantitative scores.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::grade::OkGrade;
use super::quant_fusion::{DataQualityTier, QuantitativeResult};
use super::text_overall::TextScore;

/// Which signals contribute to the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisMode {
    #[default]
    Hybrid,
    TextOnly,
    DataOnly,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Hybrid => "hybrid",
            AnalysisMode::TextOnly => "textOnly",
            AnalysisMode::DataOnly => "dataOnly",
        }
    }

    /// Quantitative extraction is skipped entirely in text-only mode.
    pub fn uses_quantitative(&self) -> bool {
        !matches!(self, AnalysisMode::TextOnly)
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', '-'], "").as_str() {
            "hybrid" => Ok(AnalysisMode::Hybrid),
            "textonly" | "text" => Ok(AnalysisMode::TextOnly),
            "dataonly" | "data" => Ok(AnalysisMode::DataOnly),
            other => Err(format!("unknown analysis mode: {}", other)),
        }
    }
}

/// Text/quantitative weight pair. Always sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionWeights {
    pub text: f64,
    pub quant: f64,
}

impl FusionWeights {
    pub const DEFAULT: FusionWeights = FusionWeights { text: 0.6, quant: 0.4 };

    /// Weights chosen by how much quantitative data the row carried.
    pub fn for_quality(quality: DataQualityTier) -> Self {
        match quality {
            DataQualityTier::None => FusionWeights { text: 0.8, quant: 0.2 },
            DataQualityTier::Low => FusionWeights { text: 0.7, quant: 0.3 },
            DataQualityTier::Medium => Self::DEFAULT,
            DataQualityTier::High => FusionWeights { text: 0.5, quant: 0.5 },
        }
    }

    pub fn for_mode(mode: AnalysisMode, quality: DataQualityTier) -> Self {
        match mode {
            AnalysisMode::Hybrid => Self::for_quality(quality),
            AnalysisMode::TextOnly => FusionWeights { text: 1.0, quant: 0.0 },
            AnalysisMode::DataOnly => FusionWeights { text: 0.0, quant: 1.0 },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridResult {
    pub overall_score: f64,
    pub grade: OkGrade,
    pub grade_description: String,
    pub percentile_label: String,
    pub confidence: f64,
    pub weights: FusionWeights,
    pub text: TextScore,
    pub quantitative: QuantitativeResult,
}

pub struct HybridFusionEngine;

impl HybridFusionEngine {
    pub fn fuse(mode: AnalysisMode, text: TextScore, quantitative: QuantitativeResult) -> HybridResult {
        let weights = FusionWeights::for_mode(mode, quantitative.quality);
        let overall_score =
            (text.score * weights.text + quantitative.score * weights.quant).clamp(0.0, 100.0);
        let confidence = (text.confidence * weights.text
            + quantitative.confidence * weights.quant)
            .clamp(0.0, 100.0);
        let grade = OkGrade::from_score(overall_score);

        HybridResult {
            overall_score,
            grade,
            grade_description: grade.description().to_string(),
            percentile_label: grade.percentile_label().to_string(),
            confidence,
            weights,
            text,
            quantitative,
        }
    }
}
