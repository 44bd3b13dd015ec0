//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::{
    GetJobResultsHandler, GetJobResultsQuery, GetJobStatusHandler, GetJobStatusQuery,
    JobOrchestrator, JobResults, JobStatusView, RecordAnalysisPipeline, RowContext,
    SubmitJobCommand, SubmitJobHandler, SubmitJobResult, DEFAULT_ENRICHMENT_DEADLINE,
    DEFAULT_PUBLISH_TIMEOUT,
};
