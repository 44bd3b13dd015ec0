//! Analysis defaults and dataset location

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;
use crate::domain::job::JobParams;
use crate::domain::scoring::{AnalysisMode, DimensionLexicon, LexiconError};

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Directory that CSV source references resolve against
    #[serde(default = "default_dataset_dir")]
    pub dataset_dir: PathBuf,

    /// YAML lexicon replacing the built-in one
    pub lexicon_path: Option<PathBuf>,

    /// Default uid column name for jobs that do not set one
    pub uid_column: Option<String>,

    /// Default opinion column name for jobs that do not set one
    pub opinion_column: Option<String>,

    /// Default analysis mode ("hybrid", "textOnly" or "dataOnly")
    #[serde(default = "default_mode")]
    pub default_mode: String,
}

impl AnalysisConfig {
    pub fn analysis_mode(&self) -> Result<AnalysisMode, ValidationError> {
        self.default_mode
            .parse()
            .map_err(|_| ValidationError::InvalidAnalysisMode(self.default_mode.clone()))
    }

    /// Job parameters applied when a request leaves fields out.
    pub fn default_params(&self) -> Result<JobParams, ValidationError> {
        Ok(JobParams {
            analysis_mode: self.analysis_mode()?,
            uid_column: self.uid_column.clone(),
            opinion_column: self.opinion_column.clone(),
            ..JobParams::default()
        })
    }

    /// The configured lexicon, or the built-in one.
    pub fn load_lexicon(&self) -> Result<DimensionLexicon, LexiconError> {
        match &self.lexicon_path {
            Some(path) => DimensionLexicon::from_yaml_file(path),
            None => Ok(DimensionLexicon::builtin().clone()),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.analysis_mode()?;
        if self.dataset_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("ANALYSIS__DATASET_DIR"));
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            dataset_dir: default_dataset_dir(),
            lexicon_path: None,
            uid_column: None,
            opinion_column: None,
            default_mode: default_mode(),
        }
    }
}

fn default_dataset_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_mode() -> String {
    "hybrid".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_hybrid_with_builtin_lexicon() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.analysis_mode().unwrap(), AnalysisMode::Hybrid);
        assert_eq!(config.load_lexicon().unwrap().dimensions().len(), 8);
    }

    #[test]
    fn default_params_carry_columns_and_mode() {
        let config = AnalysisConfig {
            default_mode: "textOnly".to_string(),
            opinion_column: Some("comment".to_string()),
            ..Default::default()
        };
        let params = config.default_params().unwrap();
        assert_eq!(params.analysis_mode, AnalysisMode::TextOnly);
        assert_eq!(params.opinion_column.as_deref(), Some("comment"));
        assert!(params.uid_column.is_none());
    }

    #[test]
    fn unknown_mode_fails_validation() {
        let config = AnalysisConfig {
            default_mode: "everything".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidAnalysisMode(_))
        ));
    }

    #[test]
    fn missing_lexicon_file_is_an_error() {
        let config = AnalysisConfig {
            lexicon_path: Some(PathBuf::from("/nonexistent/lexicon.yaml")),
            ..Default::default()
        };
        assert!(config.load_lexicon().is_err());
    }
}
