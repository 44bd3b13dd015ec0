//! PostgreSQL implementation of JobRepository.
//!
//! Jobs live in `analysis_jobs`; each analysed row is one JSONB document in
//! `analysis_records` keyed by `(job_id, row_index)`.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::analysis::AnalysisRecord;
use crate::domain::foundation::{DomainError, ErrorCode, JobId, Timestamp};
use crate::domain::job::{Job, JobParams, JobStatus};
use crate::ports::JobRepository;

/// PostgreSQL implementation of JobRepository.
#[derive(Clone)]
pub struct PostgresJobRepository {
    pool: PgPool,
}

impl PostgresJobRepository {
    /// Creates a new PostgresJobRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the bundled schema migrations.
    pub async fn migrate(&self) -> Result<(), DomainError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| db_error("Failed to run migrations", e))
    }
}

#[async_trait]
impl JobRepository for PostgresJobRepository {
    async fn save(&self, job: &Job) -> Result<(), DomainError> {
        let params = serde_json::to_value(job.params())
            .map_err(|e| db_error("Failed to encode job params", e))?;

        sqlx::query(
            r#"
            INSERT INTO analysis_jobs (
                id, source_ref, params, status, total, processed, failed_rows,
                average_score, error, created_at, ended_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(job.id().as_uuid())
        .bind(job.source_ref())
        .bind(params)
        .bind(job.status().as_str())
        .bind(job.total() as i64)
        .bind(job.processed() as i64)
        .bind(job.failed_rows() as i64)
        .bind(job.average_score())
        .bind(job.error())
        .bind(job.created_at().as_datetime())
        .bind(job.ended_at().map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert job", e))?;

        Ok(())
    }

    async fn update(&self, job: &Job) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE analysis_jobs SET
                status = $2,
                total = $3,
                processed = $4,
                failed_rows = $5,
                average_score = $6,
                error = $7,
                ended_at = $8
            WHERE id = $1
            "#,
        )
        .bind(job.id().as_uuid())
        .bind(job.status().as_str())
        .bind(job.total() as i64)
        .bind(job.processed() as i64)
        .bind(job.failed_rows() as i64)
        .bind(job.average_score())
        .bind(job.error())
        .bind(job.ended_at().map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update job", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::JobNotFound,
                format!("Job not found: {}", job.id()),
            ));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &JobId) -> Result<Option<Job>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, source_ref, params, status, total, processed, failed_rows,
                   average_score, error, created_at, ended_at
            FROM analysis_jobs
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch job", e))?;

        row.map(row_to_job).transpose()
    }

    async fn append_record(&self, record: &AnalysisRecord) -> Result<(), DomainError> {
        let document = serde_json::to_value(record)
            .map_err(|e| db_error("Failed to encode analysis record", e))?;
        let enrichment_error_code = record
            .feedback
            .as_ref()
            .and_then(|f| f.error.as_ref())
            .map(|e| e.code.as_str());

        sqlx::query(
            r#"
            INSERT INTO analysis_records (
                job_id, row_index, uid, overall_score, grade,
                enrichment_error_code, record, analyzed_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (job_id, row_index) DO UPDATE SET
                uid = EXCLUDED.uid,
                overall_score = EXCLUDED.overall_score,
                grade = EXCLUDED.grade,
                enrichment_error_code = EXCLUDED.enrichment_error_code,
                record = EXCLUDED.record,
                analyzed_at = EXCLUDED.analyzed_at
            "#,
        )
        .bind(record.job_id.as_uuid())
        .bind(record.row_index as i64)
        .bind(&record.uid)
        .bind(record.overall_score())
        .bind(record.result.grade.symbol())
        .bind(enrichment_error_code)
        .bind(document)
        .bind(record.analyzed_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert analysis record", e))?;

        Ok(())
    }

    async fn list_records(&self, job_id: &JobId) -> Result<Vec<AnalysisRecord>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT record
            FROM analysis_records
            WHERE job_id = $1
            ORDER BY row_index ASC
            "#,
        )
        .bind(job_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch analysis records", e))?;

        rows.into_iter()
            .map(|row| {
                let document: serde_json::Value = get(&row, "record")?;
                serde_json::from_value(document)
                    .map_err(|e| db_error("Failed to decode analysis record", e))
            })
            .collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn db_error(context: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, err))
}

fn get<'r, T>(row: &'r sqlx::postgres::PgRow, column: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| db_error(&format!("Failed to get {}", column), e))
}

fn row_to_job(row: sqlx::postgres::PgRow) -> Result<Job, DomainError> {
    let id: uuid::Uuid = get(&row, "id")?;
    let source_ref: String = get(&row, "source_ref")?;
    let params: serde_json::Value = get(&row, "params")?;
    let status: String = get(&row, "status")?;
    let total: i64 = get(&row, "total")?;
    let processed: i64 = get(&row, "processed")?;
    let failed_rows: i64 = get(&row, "failed_rows")?;
    let average_score: f64 = get(&row, "average_score")?;
    let error: Option<String> = get(&row, "error")?;
    let created_at: chrono::DateTime<chrono::Utc> = get(&row, "created_at")?;
    let ended_at: Option<chrono::DateTime<chrono::Utc>> = get(&row, "ended_at")?;

    let params: JobParams = serde_json::from_value(params)
        .map_err(|e| db_error("Failed to decode job params", e))?;
    let status: JobStatus = status
        .parse()
        .map_err(|e: String| DomainError::new(ErrorCode::DatabaseError, e))?;

    Ok(Job::reconstitute(
        JobId::from_uuid(id),
        source_ref,
        params,
        status,
        total.max(0) as usize,
        processed.max(0) as usize,
        failed_rows.max(0) as usize,
        average_score,
        Timestamp::from_datetime(created_at),
        ended_at.map(Timestamp::from_datetime),
        error,
    ))
}
