//! Analysis job handlers.
//!
//! - `SubmitJobHandler` creates a job and spawns its orchestrator
//! - `JobOrchestrator` runs the row loop for one job
//! - `RecordAnalysisPipeline` scores a single row
//! - `GetJobStatusHandler` / `GetJobResultsHandler` serve reads

mod get_job_results;
mod get_job_status;
mod job_orchestrator;
mod record_pipeline;
mod submit_job;

pub use get_job_results::{GetJobResultsHandler, GetJobResultsQuery, JobResults};
pub use get_job_status::{GetJobStatusHandler, GetJobStatusQuery, JobStatusView};
pub use job_orchestrator::{JobOrchestrator, DEFAULT_PUBLISH_TIMEOUT};
pub use record_pipeline::{RecordAnalysisPipeline, RowContext, DEFAULT_ENRICHMENT_DEADLINE};
pub use submit_job::{SubmitJobCommand, SubmitJobHandler, SubmitJobResult};
