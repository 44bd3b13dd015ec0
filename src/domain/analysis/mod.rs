//! Analysis domain - datasets, the column classifier and per-row records.

mod columns;
mod dataset;
mod errors;
mod record;

pub use columns::{resolve_columns, ColumnResolutionError, ColumnRoles, ResolvedBy};
pub use dataset::{ColumnKind, Dataset, DatasetRow};
pub use errors::RowAnalysisError;
pub use record::{
    AnalysisRecord, EnrichmentFailure, EnrichmentFailureCode, EnrichmentFeedback, RecordView,
    FALLBACK_SUMMARY,
};
