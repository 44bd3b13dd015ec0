//! HTTP handlers for analysis job endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::analysis::{
    GetJobResultsHandler, GetJobResultsQuery, GetJobStatusHandler, GetJobStatusQuery,
    SubmitJobCommand, SubmitJobHandler,
};
use crate::domain::foundation::{DomainError, ErrorCode, JobId};
use crate::domain::job::JobParams;

use super::dto::{
    ErrorResponse, JobResultsResponse, JobStatusResponse, SubmitJobRequest, SubmitJobResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct JobHandlers {
    submit_handler: Arc<SubmitJobHandler>,
    status_handler: Arc<GetJobStatusHandler>,
    results_handler: Arc<GetJobResultsHandler>,
    defaults: Arc<JobParams>,
}

impl JobHandlers {
    pub fn new(
        submit_handler: Arc<SubmitJobHandler>,
        status_handler: Arc<GetJobStatusHandler>,
        results_handler: Arc<GetJobResultsHandler>,
    ) -> Self {
        Self {
            submit_handler,
            status_handler,
            results_handler,
            defaults: Arc::new(JobParams::default()),
        }
    }

    /// Server-side defaults applied to fields a request leaves out.
    pub fn with_defaults(mut self, defaults: JobParams) -> Self {
        self.defaults = Arc::new(defaults);
        self
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/jobs - Submit a dataset for analysis
pub async fn submit_job(
    State(handlers): State<JobHandlers>,
    Json(req): Json<SubmitJobRequest>,
) -> Response {
    let source_ref = req.source_ref.clone();
    let params = match req.into_params(&handlers.defaults) {
        Ok(params) => params,
        Err(message) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse::bad_request(message)))
                .into_response()
        }
    };

    let cmd = SubmitJobCommand { source_ref, params };

    match handlers.submit_handler.handle(cmd).await {
        Ok(result) => {
            let response = SubmitJobResponse {
                job_id: result.job_id.to_string(),
                status: result.job.status(),
            };
            (StatusCode::ACCEPTED, Json(response)).into_response()
        }
        Err(e) => handle_domain_error(e),
    }
}

/// GET /api/jobs/:job_id - Job progress
pub async fn get_job_status(
    State(handlers): State<JobHandlers>,
    Path(job_id): Path<String>,
) -> Response {
    let job_id = match parse_job_id(&job_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.status_handler.handle(GetJobStatusQuery { job_id }).await {
        Ok(view) => {
            let response: JobStatusResponse = view.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_domain_error(e),
    }
}

/// GET /api/jobs/:job_id/results - Records analysed so far
pub async fn get_job_results(
    State(handlers): State<JobHandlers>,
    Path(job_id): Path<String>,
) -> Response {
    let job_id = match parse_job_id(&job_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.results_handler.handle(GetJobResultsQuery { job_id }).await {
        Ok(results) => {
            let response: JobResultsResponse = results.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_domain_error(e),
    }
}

fn parse_job_id(raw: &str) -> Result<JobId, Response> {
    raw.parse::<JobId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid job ID")),
        )
            .into_response()
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_domain_error(error: DomainError) -> Response {
    let status = match error.code {
        ErrorCode::ValidationFailed | ErrorCode::ColumnResolutionFailed => StatusCode::BAD_REQUEST,
        ErrorCode::JobNotFound | ErrorCode::SourceNotFound => StatusCode::NOT_FOUND,
        ErrorCode::InvalidStateTransition => StatusCode::CONFLICT,
        ErrorCode::DatabaseError | ErrorCode::PublishFailed | ErrorCode::InternalError => {
            tracing::error!(error = %error, "job request failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("internal server error")),
            )
                .into_response();
        }
    };

    (status, Json(ErrorResponse::from(&error))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_not_found_maps_to_404() {
        let response = handle_domain_error(DomainError::new(ErrorCode::JobNotFound, "missing"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_failed_maps_to_400() {
        let response = handle_domain_error(DomainError::validation("sample_size", "must be positive"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn database_error_maps_to_500() {
        let response = handle_domain_error(DomainError::new(ErrorCode::DatabaseError, "down"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn invalid_job_id_is_rejected() {
        let response = parse_job_id("not-a-uuid").unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
