//! Analysis job events.
//!
//! - `JobProgressed` - one row attempted
//! - `JobCompleted` - every row attempted
//! - `JobFailed` - job-level error

use serde::{Deserialize, Serialize};

use super::aggregate::Job;
use crate::domain::foundation::{EventId, JobId, Timestamp};

/// Published after each row is attempted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobProgressed {
    pub event_id: EventId,
    pub job_id: JobId,
    /// Zero-based index of the row just attempted.
    pub row_index: usize,
    pub row_succeeded: bool,
    pub processed: usize,
    pub failed_rows: usize,
    pub total: usize,
    pub progress: f64,
    pub average_score: f64,
    pub occurred_at: Timestamp,
}

crate::domain_event!(
    JobProgressed,
    event_type = "analysis_job.progressed.v1",
    schema_version = 1,
    aggregate_id = job_id,
    aggregate_type = "AnalysisJob",
    occurred_at = occurred_at,
    event_id = event_id
);

impl JobProgressed {
    pub fn from_job(job: &Job, row_index: usize, row_succeeded: bool) -> Self {
        Self {
            event_id: EventId::new(),
            job_id: *job.id(),
            row_index,
            row_succeeded,
            processed: job.processed(),
            failed_rows: job.failed_rows(),
            total: job.total(),
            progress: job.progress(),
            average_score: job.average_score(),
            occurred_at: Timestamp::now(),
        }
    }
}

/// Published once a job reaches `completed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCompleted {
    pub event_id: EventId,
    pub job_id: JobId,
    pub processed: usize,
    pub failed_rows: usize,
    pub total: usize,
    pub average_score: f64,
    pub completed_at: Timestamp,
}

crate::domain_event!(
    JobCompleted,
    event_type = "analysis_job.completed.v1",
    schema_version = 1,
    aggregate_id = job_id,
    aggregate_type = "AnalysisJob",
    occurred_at = completed_at,
    event_id = event_id
);

impl JobCompleted {
    pub fn from_job(job: &Job) -> Self {
        Self {
            event_id: EventId::new(),
            job_id: *job.id(),
            processed: job.processed(),
            failed_rows: job.failed_rows(),
            total: job.total(),
            average_score: job.average_score(),
            completed_at: job.ended_at().copied().unwrap_or_else(Timestamp::now),
        }
    }
}

/// Published once a job reaches `failed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobFailed {
    pub event_id: EventId,
    pub job_id: JobId,
    pub error: String,
    pub failed_at: Timestamp,
}

crate::domain_event!(
    JobFailed,
    event_type = "analysis_job.failed.v1",
    schema_version = 1,
    aggregate_id = job_id,
    aggregate_type = "AnalysisJob",
    occurred_at = failed_at,
    event_id = event_id
);

impl JobFailed {
    pub fn from_job(job: &Job) -> Self {
        Self {
            event_id: EventId::new(),
            job_id: *job.id(),
            error: job.error().unwrap_or_default().to_string(),
            failed_at: job.ended_at().copied().unwrap_or_else(Timestamp::now),
        }
    }
}
