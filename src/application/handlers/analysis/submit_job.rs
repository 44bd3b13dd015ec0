//! SubmitJobHandler - Command handler for starting an analysis job.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, Instrument};

use crate::domain::foundation::{DomainError, JobId};
use crate::domain::job::{Job, JobParams};
use crate::ports::JobRepository;

use super::job_orchestrator::JobOrchestrator;

/// Command to submit a dataset for analysis.
#[derive(Debug, Clone)]
pub struct SubmitJobCommand {
    pub source_ref: String,
    pub params: JobParams,
}

/// Result of a successful submission.
///
/// Dropping `handle` detaches the job; it keeps running in the background.
#[derive(Debug)]
pub struct SubmitJobResult {
    pub job_id: JobId,
    pub job: Job,
    pub handle: JoinHandle<Job>,
}

/// Handler for submitting analysis jobs.
pub struct SubmitJobHandler {
    repository: Arc<dyn JobRepository>,
    orchestrator: Arc<JobOrchestrator>,
}

impl SubmitJobHandler {
    pub fn new(repository: Arc<dyn JobRepository>, orchestrator: Arc<JobOrchestrator>) -> Self {
        Self {
            repository,
            orchestrator,
        }
    }

    pub async fn handle(&self, cmd: SubmitJobCommand) -> Result<SubmitJobResult, DomainError> {
        // 1. Validate and create the job
        let job = Job::new(JobId::new(), cmd.source_ref, cmd.params)?;
        let job_id = *job.id();

        // 2. Persist before anything can observe it
        self.repository.save(&job).await?;

        // 3. Run in the background
        let orchestrator = Arc::clone(&self.orchestrator);
        let span = tracing::info_span!("analysis_job", job_id = %job_id);
        let task_job = job.clone();
        let handle = tokio::spawn(async move { orchestrator.run(task_job).await }.instrument(span));

        info!(job_id = %job_id, source = %job.source_ref(), "analysis job submitted");

        Ok(SubmitJobResult {
            job_id,
            job,
            handle,
        })
    }
}
