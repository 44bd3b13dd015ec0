//! HTTP routes for analysis job endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_job_results, get_job_status, submit_job, JobHandlers};

/// Creates the job router with all endpoints. Mounted under `/api/jobs`.
pub fn job_routes(handlers: JobHandlers) -> Router {
    Router::new()
        .route("/", post(submit_job))
        .route("/:job_id", get(get_job_status))
        .route("/:job_id/results", get(get_job_results))
        .with_state(handlers)
}
