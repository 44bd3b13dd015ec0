//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod analysis;

pub use analysis::{
    // Commands
    SubmitJobCommand, SubmitJobHandler, SubmitJobResult,
    // Queries
    GetJobResultsHandler, GetJobResultsQuery, GetJobStatusHandler, GetJobStatusQuery,
    JobResults, JobStatusView,
    // Orchestration
    JobOrchestrator, RecordAnalysisPipeline, RowContext, DEFAULT_ENRICHMENT_DEADLINE,
    DEFAULT_PUBLISH_TIMEOUT,
};
