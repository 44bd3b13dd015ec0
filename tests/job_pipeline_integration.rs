//! Integration tests for batch analysis jobs.
//!
//! These tests drive the full job path with in-memory adapters:
//! 1. Submission creates a job and spawns its orchestrator
//! 2. Rows are scored, enriched and persisted in order
//! 3. Progress events are published per row, then a completion event

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use opinion_score::adapters::dataset::{CsvDirectorySource, InMemoryDatasetSource};
use opinion_score::adapters::{InMemoryEventBus, InMemoryJobRepository, MockFeedbackProvider};
use opinion_score::application::{
    GetJobResultsHandler, GetJobResultsQuery, GetJobStatusHandler, GetJobStatusQuery,
    JobOrchestrator, RecordAnalysisPipeline, SubmitJobCommand, SubmitJobHandler,
};
use opinion_score::domain::analysis::{Dataset, EnrichmentFailureCode, FALLBACK_SUMMARY};
use opinion_score::domain::job::{JobParams, JobProgressed, JobStatus};
use opinion_score::domain::scoring::{AnalysisMode, DimensionLexicon};
use opinion_score::ports::{DatasetSource, FeedbackProvider};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    repository: Arc<InMemoryJobRepository>,
    bus: Arc<InMemoryEventBus>,
    submit: SubmitJobHandler,
    status: GetJobStatusHandler,
    results: GetJobResultsHandler,
}

fn build_app(datasets: Arc<dyn DatasetSource>, pipeline: RecordAnalysisPipeline) -> TestApp {
    let repository = Arc::new(InMemoryJobRepository::new());
    let bus = Arc::new(InMemoryEventBus::new());
    let orchestrator = Arc::new(JobOrchestrator::new(
        repository.clone(),
        bus.clone(),
        datasets,
        Arc::new(pipeline),
    ));

    TestApp {
        submit: SubmitJobHandler::new(repository.clone(), orchestrator),
        status: GetJobStatusHandler::new(repository.clone()),
        results: GetJobResultsHandler::new(repository.clone()),
        repository,
        bus,
    }
}

fn lexicon() -> Arc<DimensionLexicon> {
    Arc::new(DimensionLexicon::builtin().clone())
}

fn five_row_survey() -> Dataset {
    Dataset::from_strings(
        &["사번", "uid", "의견", "점수", "등급"],
        &[
            &["1", "E1", "리더십이 뛰어나고 팀워크를 중시합니다", "92", "A"],
            &["2", "E2", "소통이 부족하고 일방적입니다", "58", "C"],
            &["3", "E3", "꼼꼼하고 성실하며 책임감이 강합니다", "85", "B+"],
            &["4", "E4", "", "70", "B"],
            &["5", "E5", "새로운 아이디어로 개선을 이끕니다", "88", "OK★"],
        ],
    )
}

async fn datasets_with(source: &str, dataset: Dataset) -> Arc<InMemoryDatasetSource> {
    let datasets = Arc::new(InMemoryDatasetSource::new());
    datasets.insert(source, dataset).await;
    datasets
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn enrichment_timeout_on_one_row_degrades_to_fallback() {
    let provider = Arc::new(
        MockFeedbackProvider::new()
            .with_feedback("첫 번째 피드백")
            .with_feedback("두 번째 피드백")
            .with_hang(Duration::from_secs(5)),
    );
    let pipeline = RecordAnalysisPipeline::new(lexicon())
        .with_feedback_provider(provider.clone() as Arc<dyn FeedbackProvider>)
        .with_enrichment_deadline(Duration::from_millis(50));
    let app = build_app(datasets_with("survey.csv", five_row_survey()).await, pipeline);

    let submitted = app
        .submit
        .handle(SubmitJobCommand {
            source_ref: "survey.csv".to_string(),
            params: JobParams {
                enrichment_enabled: true,
                ..JobParams::default()
            },
        })
        .await
        .unwrap();
    let job = submitted.handle.await.unwrap();

    assert_eq!(job.status(), JobStatus::Completed);
    assert_eq!(job.processed(), 5);
    assert_eq!(job.failed_rows(), 0);
    assert_eq!(job.progress(), 100.0);
    assert_eq!(provider.call_count(), 5);

    let results = app
        .results
        .handle(GetJobResultsQuery { job_id: *job.id() })
        .await
        .unwrap();
    assert_eq!(results.records.len(), 5);

    let third = results.records[2].feedback.as_ref().unwrap();
    assert!(third.is_fallback());
    assert_eq!(third.summary, FALLBACK_SUMMARY);
    assert_eq!(third.error.as_ref().unwrap().code, EnrichmentFailureCode::Timeout);

    for (idx, record) in results.records.iter().enumerate() {
        if idx != 2 {
            assert!(!record.feedback.as_ref().unwrap().is_fallback(), "row {idx}");
        }
    }

    let views = results.views();
    assert_eq!(views[2].enrichment_error.as_deref(), Some("TIMEOUT"));
    assert_eq!(views[0].feedback_summary.as_deref(), Some("첫 번째 피드백"));
}

#[tokio::test]
async fn status_reflects_completed_job() {
    let app = build_app(
        datasets_with("survey.csv", five_row_survey()).await,
        RecordAnalysisPipeline::new(lexicon()),
    );

    let submitted = app
        .submit
        .handle(SubmitJobCommand {
            source_ref: "survey.csv".to_string(),
            params: JobParams::default(),
        })
        .await
        .unwrap();
    submitted.handle.await.unwrap();

    let view = app
        .status
        .handle(GetJobStatusQuery {
            job_id: submitted.job_id,
        })
        .await
        .unwrap();

    assert_eq!(view.status, JobStatus::Completed);
    assert_eq!(view.total, 5);
    assert_eq!(view.processed, 5);
    assert_eq!(view.progress, 100.0);
    assert!(view.average_score > 0.0 && view.average_score <= 100.0);
    assert!(view.ended_at.is_some());
}

#[tokio::test]
async fn progress_events_are_monotonic() {
    let app = build_app(
        datasets_with("survey.csv", five_row_survey()).await,
        RecordAnalysisPipeline::new(lexicon()),
    );

    let submitted = app
        .submit
        .handle(SubmitJobCommand {
            source_ref: "survey.csv".to_string(),
            params: JobParams::default(),
        })
        .await
        .unwrap();
    submitted.handle.await.unwrap();

    let events = app
        .bus
        .events_for_aggregate(&submitted.job_id.to_string());
    let progress: Vec<f64> = events
        .iter()
        .filter(|e| e.event_type == "analysis_job.progressed.v1")
        .map(|e| e.payload_as::<JobProgressed>().unwrap().progress)
        .collect();

    assert_eq!(progress.len(), 5);
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(progress.last().copied(), Some(100.0));
    assert_eq!(
        events.last().map(|e| e.event_type.as_str()),
        Some("analysis_job.completed.v1")
    );
}

#[tokio::test]
async fn configured_columns_override_detection() {
    let dataset = Dataset::from_strings(
        &["id", "note", "memo"],
        &[&["A1", "협업을 잘합니다", "지각이 잦습니다"]],
    );
    let app = build_app(
        datasets_with("notes.csv", dataset).await,
        RecordAnalysisPipeline::new(lexicon()),
    );

    let submitted = app
        .submit
        .handle(SubmitJobCommand {
            source_ref: "notes.csv".to_string(),
            params: JobParams {
                opinion_column: Some("MEMO".to_string()),
                analysis_mode: AnalysisMode::TextOnly,
                ..JobParams::default()
            },
        })
        .await
        .unwrap();
    submitted.handle.await.unwrap();

    let results = app
        .results
        .handle(GetJobResultsQuery {
            job_id: submitted.job_id,
        })
        .await
        .unwrap();
    assert_eq!(results.records[0].uid, "A1");
    assert_eq!(results.records[0].opinion, "지각이 잦습니다");
}

#[tokio::test]
async fn missing_source_marks_job_failed() {
    let app = build_app(
        Arc::new(InMemoryDatasetSource::new()),
        RecordAnalysisPipeline::new(lexicon()),
    );

    let submitted = app
        .submit
        .handle(SubmitJobCommand {
            source_ref: "missing.csv".to_string(),
            params: JobParams::default(),
        })
        .await
        .unwrap();
    let job = submitted.handle.await.unwrap();

    assert_eq!(job.status(), JobStatus::Failed);
    assert!(job.error().is_some());
    assert!(app.bus.has_event("analysis_job.failed.v1"));
    assert_eq!(app.repository.record_count(&submitted.job_id).await, 0);
}

#[tokio::test]
async fn concurrent_jobs_do_not_interfere() {
    let datasets = Arc::new(InMemoryDatasetSource::new());
    datasets.insert("a.csv", five_row_survey()).await;
    datasets
        .insert(
            "b.csv",
            Dataset::from_strings(&["uid", "opinion"], &[&["B1", "성실합니다"], &["B2", "미숙합니다"]]),
        )
        .await;
    let app = build_app(datasets, RecordAnalysisPipeline::new(lexicon()));

    let a = app
        .submit
        .handle(SubmitJobCommand {
            source_ref: "a.csv".to_string(),
            params: JobParams::default(),
        })
        .await
        .unwrap();
    let b = app
        .submit
        .handle(SubmitJobCommand {
            source_ref: "b.csv".to_string(),
            params: JobParams::default(),
        })
        .await
        .unwrap();

    let (job_a, job_b) = tokio::join!(a.handle, b.handle);
    assert_eq!(job_a.unwrap().processed(), 5);
    assert_eq!(job_b.unwrap().processed(), 2);
    assert_eq!(app.repository.record_count(&a.job_id).await, 5);
    assert_eq!(app.repository.record_count(&b.job_id).await, 2);
}

#[tokio::test]
async fn csv_directory_source_feeds_a_job() {
    let dir = tempfile::tempdir().unwrap();
    let mut file = std::fs::File::create(dir.path().join("upload.csv")).unwrap();
    writeln!(file, "uid,comment,평점").unwrap();
    writeln!(file, "U1,\"책임감이 강하고 꼼꼼합니다\",4.5").unwrap();
    writeln!(file, "U2,\"갈등이 잦고 비협조적입니다\",2").unwrap();
    writeln!(file, "U3,extra,cells,here").unwrap();
    drop(file);

    let app = build_app(
        Arc::new(CsvDirectorySource::new(dir.path())),
        RecordAnalysisPipeline::new(lexicon()),
    );

    let submitted = app
        .submit
        .handle(SubmitJobCommand {
            source_ref: "upload.csv".to_string(),
            params: JobParams::default(),
        })
        .await
        .unwrap();
    let job = submitted.handle.await.unwrap();

    assert_eq!(job.status(), JobStatus::Completed);
    assert_eq!(job.total(), 3);
    assert_eq!(job.processed(), 2);
    assert_eq!(job.failed_rows(), 1);

    let results = app
        .results
        .handle(GetJobResultsQuery {
            job_id: submitted.job_id,
        })
        .await
        .unwrap();
    assert!(results.records[0].overall_score() > results.records[1].overall_score());
}
