//! Job repository port - the single authoritative store for analysis jobs
//! and their records.
//!
//! Each job id has exactly one writer (the task running the job), so
//! implementations only need to tolerate concurrent writers on distinct ids.

use async_trait::async_trait;

use crate::domain::analysis::AnalysisRecord;
use crate::domain::foundation::{DomainError, JobId};
use crate::domain::job::Job;

#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Save a newly submitted job.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, job: &Job) -> Result<(), DomainError>;

    /// Overwrite the stored state of an existing job.
    ///
    /// # Errors
    ///
    /// - `JobNotFound` if the job was never saved
    /// - `DatabaseError` on persistence failure
    async fn update(&self, job: &Job) -> Result<(), DomainError>;

    /// Find a job by id. Returns `None` if not found.
    async fn find_by_id(&self, id: &JobId) -> Result<Option<Job>, DomainError>;

    /// Append one analysed record to its job.
    ///
    /// # Errors
    ///
    /// - `JobNotFound` if the job was never saved
    /// - `DatabaseError` on persistence failure
    async fn append_record(&self, record: &AnalysisRecord) -> Result<(), DomainError>;

    /// All records of a job ordered by source row index.
    async fn list_records(&self, job_id: &JobId) -> Result<Vec<AnalysisRecord>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn JobRepository) {}
    }
}
