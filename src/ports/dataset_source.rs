//! DatasetSource port - loads an uploaded dataset by reference.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::analysis::Dataset;

/// Errors raised while loading a dataset. All of them are fatal to a job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("dataset not found: {0}")]
    NotFound(String),

    #[error("invalid dataset reference: {0}")]
    InvalidReference(String),

    #[error("dataset unreadable: {0}")]
    Unreadable(String),
}

#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Load the full dataset behind `source_ref`.
    async fn load(&self, source_ref: &str) -> Result<Dataset, DatasetError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_source_is_object_safe() {
        fn _accepts_dyn(_source: &dyn DatasetSource) {}
    }

    #[test]
    fn errors_display_reference() {
        let err = DatasetError::NotFound("survey.csv".to_string());
        assert_eq!(err.to_string(), "dataset not found: survey.csv");
    }
}
