//! Dimension lexicon - the static keyword configuration behind text scoring.
//!
//! Eight competency dimensions, each with positive and negative keyword lists
//! and a weight. Weights must sum to 1.0; the lexicon is validated once at load
//! and is immutable afterwards.

use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of dimensions every lexicon must define.
pub const DIMENSION_COUNT: usize = 8;

/// Tolerance used when checking that weights sum to 1.0.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Errors raised while loading or validating a lexicon.
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("expected {expected} dimensions, found {actual}")]
    WrongDimensionCount { expected: usize, actual: usize },

    #[error("duplicate dimension id '{0}'")]
    DuplicateDimension(String),

    #[error("dimension '{id}' has weight {weight} outside (0, 1]")]
    InvalidWeight { id: String, weight: f64 },

    #[error("dimension weights sum to {0}, expected 1.0")]
    WeightSum(f64),

    #[error("dimension '{0}' has no keywords")]
    EmptyKeywords(String),

    #[error("failed to read lexicon file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse lexicon: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// One competency dimension and its keyword lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionConfig {
    pub id: String,
    pub label: String,
    pub positive_keywords: Vec<String>,
    pub negative_keywords: Vec<String>,
    pub weight: f64,
}

impl DimensionConfig {
    fn new(id: &str, label: &str, positive: &[&str], negative: &[&str], weight: f64) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            positive_keywords: positive.iter().map(|k| k.to_string()).collect(),
            negative_keywords: negative.iter().map(|k| k.to_string()).collect(),
            weight,
        }
    }

    fn lowercase_keywords(&mut self) {
        for keyword in self
            .positive_keywords
            .iter_mut()
            .chain(self.negative_keywords.iter_mut())
        {
            *keyword = keyword.trim().to_lowercase();
        }
        self.positive_keywords.retain(|k| !k.is_empty());
        self.negative_keywords.retain(|k| !k.is_empty());
    }
}

/// A validated, immutable set of dimension configurations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionLexicon {
    dimensions: Vec<DimensionConfig>,
}

#[derive(Deserialize)]
struct LexiconFile {
    dimensions: Vec<DimensionConfig>,
}

static BUILTIN: Lazy<DimensionLexicon> = Lazy::new(|| DimensionLexicon {
    dimensions: builtin_dimensions(),
});

impl DimensionLexicon {
    /// Builds a lexicon, normalizing keywords to lowercase and validating invariants.
    pub fn new(mut dimensions: Vec<DimensionConfig>) -> Result<Self, LexiconError> {
        for dimension in &mut dimensions {
            dimension.lowercase_keywords();
        }
        let lexicon = Self { dimensions };
        lexicon.validate()?;
        Ok(lexicon)
    }

    /// The built-in Korean/English competency lexicon.
    pub fn builtin() -> &'static DimensionLexicon {
        &BUILTIN
    }

    /// Parses a lexicon from YAML of the form `dimensions: [{id, label, ...}]`.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, LexiconError> {
        let file: LexiconFile = serde_yaml::from_str(yaml)?;
        Self::new(file.dimensions)
    }

    /// Reads and parses a YAML lexicon file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Checks dimension count, id uniqueness, weight range, keywords and weight sum.
    pub fn validate(&self) -> Result<(), LexiconError> {
        if self.dimensions.len() != DIMENSION_COUNT {
            return Err(LexiconError::WrongDimensionCount {
                expected: DIMENSION_COUNT,
                actual: self.dimensions.len(),
            });
        }

        let mut seen = HashSet::new();
        for dimension in &self.dimensions {
            if !seen.insert(dimension.id.as_str()) {
                return Err(LexiconError::DuplicateDimension(dimension.id.clone()));
            }
            if !(dimension.weight > 0.0 && dimension.weight <= 1.0) {
                return Err(LexiconError::InvalidWeight {
                    id: dimension.id.clone(),
                    weight: dimension.weight,
                });
            }
            if dimension.positive_keywords.is_empty() && dimension.negative_keywords.is_empty() {
                return Err(LexiconError::EmptyKeywords(dimension.id.clone()));
            }
        }

        let sum = self.weight_sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(LexiconError::WeightSum(sum));
        }

        Ok(())
    }

    pub fn dimensions(&self) -> &[DimensionConfig] {
        &self.dimensions
    }

    pub fn get(&self, id: &str) -> Option<&DimensionConfig> {
        self.dimensions.iter().find(|d| d.id == id)
    }

    pub fn weight_of(&self, id: &str) -> Option<f64> {
        self.get(id).map(|d| d.weight)
    }

    pub fn weight_sum(&self) -> f64 {
        self.dimensions.iter().map(|d| d.weight).sum()
    }
}

impl Default for DimensionLexicon {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

fn builtin_dimensions() -> Vec<DimensionConfig> {
    // Keywords are stored lowercase. Negative keywords must not contain a positive
    // keyword of the same dimension as a substring.
    vec![
        DimensionConfig::new(
            "leadership",
            "리더십",
            &["리더십", "주도적", "솔선", "이끌", "비전", "결단력", "leadership", "initiative", "mentor"],
            &["우유부단", "방관", "소극적", "indecisive", "passive"],
            0.15,
        ),
        DimensionConfig::new(
            "communication",
            "의사소통",
            &["소통", "경청", "설명을 잘", "공유", "협의", "communicat", "listen", "articulate"],
            &["불통", "일방적", "전달이 부족", "오해", "misunderstand", "unclear"],
            0.15,
        ),
        DimensionConfig::new(
            "expertise",
            "직무전문성",
            &["전문성", "숙련", "지식", "역량", "정확", "expert", "skilled", "knowledge", "accurate"],
            &["미숙", "실수", "오류", "서툴", "inexperienced", "mistake", "error"],
            0.15,
        ),
        DimensionConfig::new(
            "teamwork",
            "협업",
            &["협업", "협력", "팀워크", "배려", "지원", "도움", "collaborat", "teamwork", "support", "helpful"],
            &["갈등", "비협조", "이기적", "고립", "conflict", "selfish", "uncooperative"],
            0.15,
        ),
        DimensionConfig::new(
            "responsibility",
            "책임감",
            &["책임감", "성실", "꼼꼼", "신뢰", "약속", "reliable", "responsible", "diligent", "dependable"],
            &["무책임", "지각", "지연", "누락", "태만", "missed deadline", "careless", "negligent"],
            0.10,
        ),
        DimensionConfig::new(
            "innovation",
            "혁신",
            &["창의", "혁신", "개선", "아이디어", "새로운", "creative", "innovative", "idea", "improve"],
            &["보수적", "관성", "변화를 거부", "resistant", "rigid", "outdated"],
            0.10,
        ),
        DimensionConfig::new(
            "problem_solving",
            "문제해결",
            &["해결", "분석", "논리", "대안", "판단력", "solving", "solution", "analytical", "logical"],
            &["회피", "방치", "막연", "avoid", "unresolved", "confused"],
            0.10,
        ),
        DimensionConfig::new(
            "growth",
            "성장의지",
            &["성장", "학습", "발전", "노력", "열정", "도전", "growth", "learn", "motivated", "passion"],
            &["정체", "안주", "무관심", "의욕이 없", "stagnant", "complacent", "disengaged"],
            0.10,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml_with_weights(weights: [f64; 8]) -> String {
        let mut yaml = String::from("dimensions:\n");
        for (i, w) in weights.iter().enumerate() {
            yaml.push_str(&format!(
                "  - id: dim{i}\n    label: Dim {i}\n    positive_keywords: [\"Good{i}\"]\n    negative_keywords: [\"bad{i}\"]\n    weight: {w}\n"
            ));
        }
        yaml
    }

    #[test]
    fn builtin_lexicon_is_valid() {
        let lexicon = DimensionLexicon::builtin();
        assert!(lexicon.validate().is_ok());
        assert_eq!(lexicon.dimensions().len(), DIMENSION_COUNT);
        assert!((lexicon.weight_sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn builtin_negative_keywords_do_not_contain_positive_ones() {
        for dim in DimensionLexicon::builtin().dimensions() {
            for neg in &dim.negative_keywords {
                for pos in &dim.positive_keywords {
                    assert!(
                        !neg.contains(pos.as_str()),
                        "{}: '{}' contains '{}'",
                        dim.id,
                        neg,
                        pos
                    );
                }
            }
        }
    }

    #[test]
    fn yaml_lexicon_loads_and_lowercases_keywords() {
        let lexicon =
            DimensionLexicon::from_yaml_str(&yaml_with_weights([0.125; 8])).unwrap();
        assert_eq!(lexicon.get("dim0").unwrap().positive_keywords, vec!["good0"]);
        assert_eq!(lexicon.weight_of("dim7"), Some(0.125));
    }

    #[test]
    fn weights_not_summing_to_one_are_rejected() {
        let result = DimensionLexicon::from_yaml_str(&yaml_with_weights([0.1; 8]));
        assert!(matches!(result, Err(LexiconError::WeightSum(_))));
    }

    #[test]
    fn zero_weight_is_rejected() {
        let result = DimensionLexicon::from_yaml_str(&yaml_with_weights([
            0.0, 0.2, 0.2, 0.2, 0.1, 0.1, 0.1, 0.1,
        ]));
        assert!(matches!(result, Err(LexiconError::InvalidWeight { .. })));
    }

    #[test]
    fn wrong_dimension_count_is_rejected() {
        let dims = DimensionLexicon::builtin().dimensions()[..7].to_vec();
        assert!(matches!(
            DimensionLexicon::new(dims),
            Err(LexiconError::WrongDimensionCount { expected: 8, actual: 7 })
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut dims = DimensionLexicon::builtin().dimensions().to_vec();
        dims[1].id = dims[0].id.clone();
        assert!(matches!(
            DimensionLexicon::new(dims),
            Err(LexiconError::DuplicateDimension(_))
        ));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        assert!(matches!(
            DimensionLexicon::from_yaml_str("dimensions: [oops"),
            Err(LexiconError::Parse(_))
        ));
    }
}
