//! Domain layer containing the scoring logic and the analysis job model.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, events, errors)
//! - `scoring` - Lexicon text scoring, quantitative fusion, hybrid grading, explainability
//! - `analysis` - Datasets, column classification and per-row analysis records
//! - `job` - Analysis job aggregate, lifecycle and events

pub mod analysis;
pub mod foundation;
pub mod job;
pub mod scoring;
