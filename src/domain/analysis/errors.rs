//! Row-scoped analysis errors. These never fail a job; the row is skipped.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowAnalysisError {
    #[error("row {row}: expected {expected} cells, found {actual}")]
    MalformedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("row {row}: computed score is not a finite number")]
    NonFiniteScore { row: usize },
}

impl RowAnalysisError {
    pub fn row(&self) -> usize {
        match self {
            RowAnalysisError::MalformedRow { row, .. } | RowAnalysisError::NonFiniteScore { row } => *row,
        }
    }
}
