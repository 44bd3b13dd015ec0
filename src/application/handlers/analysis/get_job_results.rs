//! GetJobResultsHandler - Query handler for a job's analysis records.

use std::sync::Arc;

use crate::domain::analysis::{AnalysisRecord, RecordView};
use crate::domain::foundation::{DomainError, JobId};
use crate::domain::job::Job;
use crate::ports::JobRepository;

use super::get_job_status::job_not_found;

/// Query for the records of a job.
#[derive(Debug, Clone)]
pub struct GetJobResultsQuery {
    pub job_id: JobId,
}

/// Records of a job, ordered by row index.
///
/// Results of a job that is still processing are partial.
#[derive(Debug, Clone)]
pub struct JobResults {
    pub job: Job,
    pub records: Vec<AnalysisRecord>,
}

impl JobResults {
    /// Flat projections for exporters.
    pub fn views(&self) -> Vec<RecordView> {
        self.records.iter().map(AnalysisRecord::view).collect()
    }
}

/// Handler for job result queries.
pub struct GetJobResultsHandler {
    repository: Arc<dyn JobRepository>,
}

impl GetJobResultsHandler {
    pub fn new(repository: Arc<dyn JobRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetJobResultsQuery) -> Result<JobResults, DomainError> {
        let job = self
            .repository
            .find_by_id(&query.job_id)
            .await?
            .ok_or_else(|| job_not_found(&query.job_id))?;

        let records = self.repository.list_records(&query.job_id).await?;

        Ok(JobResults { job, records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryJobRepository;
    use crate::application::handlers::analysis::{RecordAnalysisPipeline, RowContext};
    use crate::domain::analysis::{resolve_columns, Dataset};
    use crate::domain::foundation::{ErrorCode, Timestamp};
    use crate::domain::job::JobParams;
    use crate::domain::scoring::DimensionLexicon;

    #[tokio::test]
    async fn returns_records_in_row_order() {
        let repository = Arc::new(InMemoryJobRepository::new());
        let job = Job::new(JobId::new(), "survey.csv", JobParams::default()).unwrap();
        repository.save(&job).await.unwrap();

        let dataset = Dataset::from_strings(
            &["uid", "opinion"],
            &[&["E1", "꼼꼼합니다"], &["E2", "소극적입니다"]],
        );
        let roles = resolve_columns(dataset.headers(), &dataset.column_kinds(), None, None).unwrap();
        let params = JobParams::default();
        let ctx = RowContext {
            job_id: *job.id(),
            headers: dataset.headers(),
            roles,
            params: &params,
        };
        let pipeline = RecordAnalysisPipeline::new(Arc::new(DimensionLexicon::builtin().clone()));

        for row in dataset.rows().iter().rev() {
            let record = pipeline.score_row(ctx, row, Timestamp::now()).unwrap();
            repository.append_record(&record).await.unwrap();
        }

        let handler = GetJobResultsHandler::new(repository);
        let results = handler
            .handle(GetJobResultsQuery { job_id: *job.id() })
            .await
            .unwrap();

        let uids: Vec<&str> = results.records.iter().map(|r| r.uid.as_str()).collect();
        assert_eq!(uids, vec!["E1", "E2"]);

        let views = results.views();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].uid, "E1");
        assert_eq!(views[0].dimensions.len(), 8);
    }

    #[tokio::test]
    async fn unknown_job_is_not_found() {
        let handler = GetJobResultsHandler::new(Arc::new(InMemoryJobRepository::new()));

        let err = handler
            .handle(GetJobResultsQuery {
                job_id: JobId::new(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::JobNotFound);
    }
}
