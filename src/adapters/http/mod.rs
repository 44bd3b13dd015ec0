//! HTTP adapters - REST API implementations.
//!
//! `api_router` assembles the public surface:
//! - `GET /health`
//! - `/api/jobs` - analysis job endpoints

pub mod jobs;

use std::time::Duration;

use axum::{
    http::{HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use jobs::{job_routes, JobHandlers};

/// Builds the application router.
pub fn api_router(handlers: JobHandlers, cors_origins: &[String], request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/jobs", job_routes(handlers))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    if origins.is_empty() {
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
