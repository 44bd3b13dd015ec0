//! In-Memory Job Repository Adapter
//!
//! Stores jobs and their records in memory. Used for tests and when no
//! database is configured.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::analysis::AnalysisRecord;
use crate::domain::foundation::{DomainError, ErrorCode, JobId};
use crate::domain::job::Job;
use crate::ports::JobRepository;

/// In-memory storage for analysis jobs
#[derive(Debug, Clone, Default)]
pub struct InMemoryJobRepository {
    jobs: Arc<RwLock<HashMap<JobId, Job>>>,
    records: Arc<RwLock<HashMap<JobId, Vec<AnalysisRecord>>>>,
    fail_record_writes: Arc<AtomicBool>,
}

impl InMemoryJobRepository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `append_record` fail (for exercising persistence errors)
    pub fn set_failing_record_writes(&self, failing: bool) {
        self.fail_record_writes.store(failing, Ordering::SeqCst);
    }

    /// Get the number of stored jobs
    pub async fn job_count(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Get the number of stored records for a job
    pub async fn record_count(&self, job_id: &JobId) -> usize {
        self.records
            .read()
            .await
            .get(job_id)
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn not_found(id: &JobId) -> DomainError {
        DomainError::new(ErrorCode::JobNotFound, format!("Job not found: {}", id))
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn save(&self, job: &Job) -> Result<(), DomainError> {
        self.jobs.write().await.insert(*job.id(), job.clone());
        self.records.write().await.entry(*job.id()).or_default();
        Ok(())
    }

    async fn update(&self, job: &Job) -> Result<(), DomainError> {
        let mut jobs = self.jobs.write().await;
        match jobs.get_mut(job.id()) {
            Some(stored) => {
                *stored = job.clone();
                Ok(())
            }
            None => Err(Self::not_found(job.id())),
        }
    }

    async fn find_by_id(&self, id: &JobId) -> Result<Option<Job>, DomainError> {
        Ok(self.jobs.read().await.get(id).cloned())
    }

    async fn append_record(&self, record: &AnalysisRecord) -> Result<(), DomainError> {
        if self.fail_record_writes.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "record writes are disabled",
            ));
        }

        let mut records = self.records.write().await;
        let job_records = records
            .get_mut(&record.job_id)
            .ok_or_else(|| Self::not_found(&record.job_id))?;

        // Rows arrive in order, so this is almost always a push at the end.
        match job_records.binary_search_by_key(&record.row_index, |r| r.row_index) {
            Ok(existing) => job_records[existing] = record.clone(),
            Err(position) => job_records.insert(position, record.clone()),
        }
        Ok(())
    }

    async fn list_records(&self, job_id: &JobId) -> Result<Vec<AnalysisRecord>, DomainError> {
        Ok(self
            .records
            .read()
            .await
            .get(job_id)
            .cloned()
            .unwrap_or_default())
    }
}
