//! GetJobStatusHandler - Query handler for job progress.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode, JobId, Timestamp};
use crate::domain::job::{Job, JobStatus};
use crate::ports::JobRepository;

/// Query for the status of a job.
#[derive(Debug, Clone)]
pub struct GetJobStatusQuery {
    pub job_id: JobId,
}

/// Snapshot of a job's progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobStatusView {
    pub job_id: JobId,
    pub source_ref: String,
    pub status: JobStatus,
    pub progress: f64,
    pub processed: usize,
    pub failed_rows: usize,
    pub total: usize,
    pub average_score: f64,
    pub error: Option<String>,
    pub created_at: Timestamp,
    pub ended_at: Option<Timestamp>,
}

impl From<&Job> for JobStatusView {
    fn from(job: &Job) -> Self {
        Self {
            job_id: *job.id(),
            source_ref: job.source_ref().to_string(),
            status: job.status(),
            progress: job.progress(),
            processed: job.processed(),
            failed_rows: job.failed_rows(),
            total: job.total(),
            average_score: job.average_score(),
            error: job.error().map(str::to_string),
            created_at: *job.created_at(),
            ended_at: job.ended_at().copied(),
        }
    }
}

/// Handler for job status queries.
pub struct GetJobStatusHandler {
    repository: Arc<dyn JobRepository>,
}

impl GetJobStatusHandler {
    pub fn new(repository: Arc<dyn JobRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetJobStatusQuery) -> Result<JobStatusView, DomainError> {
        let job = self
            .repository
            .find_by_id(&query.job_id)
            .await?
            .ok_or_else(|| job_not_found(&query.job_id))?;

        Ok(JobStatusView::from(&job))
    }
}

pub(crate) fn job_not_found(job_id: &JobId) -> DomainError {
    DomainError::new(ErrorCode::JobNotFound, format!("job {job_id} not found"))
        .with_detail("job_id", job_id.to_string())
}
