//! JobOrchestrator - drives one analysis job from dataset to summary.
//!
//! The orchestrator task is the only writer for its job. Rows are processed
//! strictly in order; a row error is logged and skipped, and only failures
//! before the row loop (unreadable source, unresolvable columns) fail the job.
//!
//! Persistence errors inside the loop are logged and the job keeps going.
//! Event publishing is fire-and-forget: each publish is bounded by
//! `publish_timeout` and its outcome never reaches the row loop.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::domain::analysis::{resolve_columns, ColumnRoles, Dataset};
use crate::domain::foundation::{DomainError, EventEnvelope, SerializableDomainEvent, Timestamp};
use crate::domain::job::{Job, JobCompleted, JobFailed, JobProgressed};
use crate::ports::{DatasetSource, EventPublisher, JobRepository};

use super::record_pipeline::{RecordAnalysisPipeline, RowContext};

/// Upper bound on a single progress/completion publish.
pub const DEFAULT_PUBLISH_TIMEOUT: Duration = Duration::from_secs(2);

/// Runs analysis jobs to completion.
pub struct JobOrchestrator {
    repository: Arc<dyn JobRepository>,
    publisher: Arc<dyn EventPublisher>,
    datasets: Arc<dyn DatasetSource>,
    pipeline: Arc<RecordAnalysisPipeline>,
    publish_timeout: Duration,
}

impl JobOrchestrator {
    pub fn new(
        repository: Arc<dyn JobRepository>,
        publisher: Arc<dyn EventPublisher>,
        datasets: Arc<dyn DatasetSource>,
        pipeline: Arc<RecordAnalysisPipeline>,
    ) -> Self {
        Self {
            repository,
            publisher,
            datasets,
            pipeline,
            publish_timeout: DEFAULT_PUBLISH_TIMEOUT,
        }
    }

    pub fn with_publish_timeout(mut self, timeout: Duration) -> Self {
        self.publish_timeout = timeout;
        self
    }

    /// Runs `job` and returns it in its terminal state.
    pub async fn run(&self, mut job: Job) -> Job {
        let job_id = *job.id();
        info!(
            job_id = %job_id,
            source = %job.source_ref(),
            mode = %job.params().analysis_mode,
            "analysis job started"
        );

        // 1. Load the dataset
        let mut dataset = match self.datasets.load(job.source_ref()).await {
            Ok(dataset) => dataset,
            Err(err) => return self.fail(job, format!("dataset unavailable: {err}")).await,
        };

        // 2. Sample
        if let Some(size) = job.params().sample_size {
            dataset.truncate(size);
        }

        // 3. Resolve uid/opinion columns
        let roles = match resolve_columns(
            dataset.headers(),
            &dataset.column_kinds(),
            job.params().uid_column.as_deref(),
            job.params().opinion_column.as_deref(),
        ) {
            Ok(roles) => roles,
            Err(err) => return self.fail(job, format!("column resolution failed: {err}")).await,
        };
        debug!(
            job_id = %job_id,
            uid_column = %dataset.headers()[roles.uid],
            opinion_column = %dataset.headers()[roles.opinion],
            "columns resolved"
        );

        // 4. Start
        if let Err(err) = job.start(dataset.len()) {
            return self.fail(job, err.message).await;
        }
        self.persist(&job).await;

        // 5. Row loop
        self.process_rows(&mut job, &dataset, roles).await;

        // 6. Complete
        if let Err(err) = job.complete() {
            error!(job_id = %job_id, error = %err, "could not complete job");
            return job;
        }
        self.persist(&job).await;
        self.notify(JobCompleted::from_job(&job).to_envelope()).await;

        info!(
            job_id = %job_id,
            processed = job.processed(),
            failed_rows = job.failed_rows(),
            average_score = job.average_score(),
            "analysis job completed"
        );
        job
    }

    async fn process_rows(&self, job: &mut Job, dataset: &Dataset, roles: ColumnRoles) {
        let job_id = *job.id();
        let params = job.params().clone();
        let ctx = RowContext {
            job_id,
            headers: dataset.headers(),
            roles,
            params: &params,
        };

        for row in dataset.rows() {
            let outcome = self.pipeline.analyze(ctx, row, Timestamp::now()).await;

            let succeeded = match outcome {
                Ok(record) => {
                    if let Err(err) = self.repository.append_record(&record).await {
                        warn!(job_id = %job_id, row = row.index, error = %err, "failed to persist record");
                    }
                    record_counter(job.record_success(record.overall_score()));
                    true
                }
                Err(err) => {
                    warn!(job_id = %job_id, row = err.row(), error = %err, "row skipped");
                    record_counter(job.record_failure());
                    false
                }
            };

            self.persist(job).await;
            self.notify(JobProgressed::from_job(job, row.index, succeeded).to_envelope())
                .await;

            tokio::task::yield_now().await;
        }
    }

    async fn fail(&self, mut job: Job, message: String) -> Job {
        error!(job_id = %job.id(), error = %message, "analysis job failed");

        if let Err(err) = job.fail(message) {
            error!(job_id = %job.id(), error = %err, "could not mark job failed");
            return job;
        }
        self.persist(&job).await;
        self.notify(JobFailed::from_job(&job).to_envelope()).await;
        job
    }

    async fn persist(&self, job: &Job) {
        if let Err(err) = self.repository.update(job).await {
            warn!(job_id = %job.id(), error = %err, "failed to persist job state");
        }
    }

    async fn notify(&self, envelope: Result<EventEnvelope, serde_json::Error>) {
        let envelope = match envelope {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(error = %err, "failed to serialize job event");
                return;
            }
        };

        let event_type = envelope.event_type.clone();
        match tokio::time::timeout(self.publish_timeout, self.publisher.publish(envelope)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                debug!(event_type = %event_type, error = %err, "job event not delivered");
            }
            Err(_) => {
                warn!(
                    event_type = %event_type,
                    timeout_ms = self.publish_timeout.as_millis() as u64,
                    "job event publish timed out"
                );
            }
        }
    }
}

fn record_counter(result: Result<(), DomainError>) {
    if let Err(err) = result {
        error!(error = %err, "job counter update rejected");
    }
}
