//! Integration tests for the job HTTP endpoints.
//!
//! The full router is driven with `tower::ServiceExt::oneshot` over
//! in-memory adapters.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use opinion_score::adapters::dataset::InMemoryDatasetSource;
use opinion_score::adapters::http::{api_router, JobHandlers};
use opinion_score::adapters::{InMemoryEventBus, InMemoryJobRepository};
use opinion_score::application::{
    GetJobResultsHandler, GetJobStatusHandler, JobOrchestrator, RecordAnalysisPipeline,
    SubmitJobHandler,
};
use opinion_score::domain::analysis::Dataset;
use opinion_score::domain::scoring::DimensionLexicon;

// =============================================================================
// Test Infrastructure
// =============================================================================

async fn test_router() -> Router {
    let datasets = Arc::new(InMemoryDatasetSource::new());
    datasets
        .insert(
            "survey.csv",
            Dataset::from_strings(
                &["uid", "opinion", "점수"],
                &[
                    &["E1", "책임감이 강하고 꼼꼼합니다", "90"],
                    &["E2", "소통이 부족합니다", "55"],
                    &["E3", "협업을 잘합니다", "80"],
                ],
            ),
        )
        .await;

    let repository = Arc::new(InMemoryJobRepository::new());
    let pipeline = RecordAnalysisPipeline::new(Arc::new(DimensionLexicon::builtin().clone()));
    let orchestrator = Arc::new(JobOrchestrator::new(
        repository.clone(),
        Arc::new(InMemoryEventBus::new()),
        datasets,
        Arc::new(pipeline),
    ));

    let handlers = JobHandlers::new(
        Arc::new(SubmitJobHandler::new(repository.clone(), orchestrator)),
        Arc::new(GetJobStatusHandler::new(repository.clone())),
        Arc::new(GetJobResultsHandler::new(repository)),
    );

    api_router(handlers, &[], Duration::from_secs(5))
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn wait_until_finished(router: &Router, job_id: &str) -> Value {
    for _ in 0..200 {
        let (status, body) = send(router, get(&format!("/api/jobs/{job_id}"))).await;
        assert_eq!(status, StatusCode::OK);
        if body["status"] != "processing" {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {job_id} did not finish");
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn health_check_responds() {
    let router = test_router().await;
    let (status, body) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn submit_then_poll_then_fetch_results() {
    let router = test_router().await;

    let (status, body) = send(
        &router,
        post_json("/api/jobs", json!({ "sourceRef": "survey.csv", "analysisMode": "hybrid" })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["status"], "processing");
    let job_id = body["jobId"].as_str().unwrap().to_string();

    let finished = wait_until_finished(&router, &job_id).await;
    assert_eq!(finished["status"], "completed");
    assert_eq!(finished["progress"], 100.0);
    assert_eq!(finished["processed"], 3);
    assert_eq!(finished["total"], 3);
    assert_eq!(finished["failedRows"], 0);
    assert!(finished.get("error").is_none());

    let (status, results) = send(&router, get(&format!("/api/jobs/{job_id}/results"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(results["count"], 3);
    let records = results["records"].as_array().unwrap();
    assert_eq!(records[0]["uid"], "E1");
    assert_eq!(records[2]["uid"], "E3");
    assert!(records[0]["dim_responsibility"].is_number());
    assert!(records[0]["grade"].as_str().unwrap().starts_with("OK"));
}

#[tokio::test]
async fn missing_dataset_reports_failed_status() {
    let router = test_router().await;

    let (status, body) = send(&router, post_json("/api/jobs", json!({ "sourceRef": "nope.csv" }))).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let job_id = body["jobId"].as_str().unwrap().to_string();

    let finished = wait_until_finished(&router, &job_id).await;
    assert_eq!(finished["status"], "failed");
    assert!(finished["error"].as_str().unwrap().contains("nope.csv"));
}

#[tokio::test]
async fn zero_sample_size_is_rejected() {
    let router = test_router().await;

    let (status, body) = send(
        &router,
        post_json("/api/jobs", json!({ "sourceRef": "survey.csv", "sampleSize": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn unknown_analysis_mode_is_rejected() {
    let router = test_router().await;

    let (status, body) = send(
        &router,
        post_json("/api/jobs", json!({ "sourceRef": "survey.csv", "analysisMode": "astrology" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn unknown_job_is_404() {
    let router = test_router().await;
    let (status, body) = send(
        &router,
        get("/api/jobs/00000000-0000-4000-8000-000000000000"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "JOB_NOT_FOUND");
}

#[tokio::test]
async fn malformed_job_id_is_400() {
    let router = test_router().await;
    let (status, _) = send(&router, get("/api/jobs/not-a-job/results")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
