//! HTTP adapter for analysis job endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    EnrichmentParamsRequest, ErrorResponse, JobResultsResponse, JobStatusResponse,
    SubmitJobRequest, SubmitJobResponse,
};
pub use handlers::JobHandlers;
pub use routes::job_routes;
