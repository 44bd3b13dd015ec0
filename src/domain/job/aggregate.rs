//! Analysis job aggregate.
//!
//! A job tracks one batch run over a dataset: how many rows there are, how
//! many were analysed or skipped, and the running average of the scores.
//! The orchestrator task that runs the job is its only writer.

use serde::{Deserialize, Serialize};

use super::params::JobParams;
use super::status::JobStatus;
use crate::domain::foundation::{DomainError, ErrorCode, JobId, StateMachine, Timestamp};

/// Analysis job aggregate.
///
/// # Invariants
///
/// - `processed + failed_rows <= total` once `total` is known
/// - `average_score` is the mean over processed rows only (0 when none)
/// - `ended_at` and `error` are set only in terminal states; `error` only when failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    id: JobId,
    source_ref: String,
    params: JobParams,
    status: JobStatus,
    total: usize,
    processed: usize,
    failed_rows: usize,
    average_score: f64,
    created_at: Timestamp,
    ended_at: Option<Timestamp>,
    error: Option<String>,
}

impl Job {
    /// Create a new job in the processing state.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the source reference is blank or the parameters are invalid
    pub fn new(id: JobId, source_ref: impl Into<String>, params: JobParams) -> Result<Self, DomainError> {
        let source_ref = source_ref.into();
        if source_ref.trim().is_empty() {
            return Err(DomainError::validation("source_ref", "Source reference cannot be empty"));
        }
        params.validate()?;

        Ok(Self {
            id,
            source_ref,
            params,
            status: JobStatus::Processing,
            total: 0,
            processed: 0,
            failed_rows: 0,
            average_score: 0.0,
            created_at: Timestamp::now(),
            ended_at: None,
            error: None,
        })
    }

    /// Reconstitute a job from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: JobId,
        source_ref: String,
        params: JobParams,
        status: JobStatus,
        total: usize,
        processed: usize,
        failed_rows: usize,
        average_score: f64,
        created_at: Timestamp,
        ended_at: Option<Timestamp>,
        error: Option<String>,
    ) -> Self {
        Self {
            id,
            source_ref,
            params,
            status,
            total,
            processed,
            failed_rows,
            average_score,
            created_at,
            ended_at,
            error,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn source_ref(&self) -> &str {
        &self.source_ref
    }

    pub fn params(&self) -> &JobParams {
        &self.params
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn failed_rows(&self) -> usize {
        self.failed_rows
    }

    /// Rows attempted so far, successful or not.
    pub fn attempted(&self) -> usize {
        self.processed + self.failed_rows
    }

    pub fn average_score(&self) -> f64 {
        self.average_score
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn ended_at(&self) -> Option<&Timestamp> {
        self.ended_at.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Percentage of rows attempted, clamped to 100. Always 100 once completed.
    pub fn progress(&self) -> f64 {
        match self.status {
            JobStatus::Completed => 100.0,
            _ if self.total == 0 => 0.0,
            _ => (self.attempted() as f64 / self.total as f64 * 100.0).min(100.0),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Record the number of rows that will be attempted.
    pub fn start(&mut self, total: usize) -> Result<(), DomainError> {
        self.ensure_processing()?;
        self.total = total;
        Ok(())
    }

    /// Count a successfully analysed row and fold its score into the average.
    pub fn record_success(&mut self, score: f64) -> Result<(), DomainError> {
        self.ensure_processing()?;
        self.processed += 1;
        self.average_score += (score - self.average_score) / self.processed as f64;
        Ok(())
    }

    /// Count a row that was skipped because it could not be analysed.
    pub fn record_failure(&mut self) -> Result<(), DomainError> {
        self.ensure_processing()?;
        self.failed_rows += 1;
        Ok(())
    }

    /// # Errors
    ///
    /// - `InvalidStateTransition` if the job already ended
    pub fn complete(&mut self) -> Result<(), DomainError> {
        self.transition(JobStatus::Completed)?;
        self.ended_at = Some(Timestamp::now());
        Ok(())
    }

    /// # Errors
    ///
    /// - `InvalidStateTransition` if the job already ended
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), DomainError> {
        self.transition(JobStatus::Failed)?;
        self.ended_at = Some(Timestamp::now());
        self.error = Some(message.into());
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn transition(&mut self, target: JobStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot move job from {} to {}", self.status, target),
            )
        })?;
        Ok(())
    }

    fn ensure_processing(&self) -> Result<(), DomainError> {
        if self.status == JobStatus::Processing {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Job {} has already {}", self.id, self.status),
            ))
        }
    }
}
