//! Opinion Score - hybrid scoring of employee opinions
//!
//! Scores free-text opinions against an eight-dimension lexicon, fuses the
//! result with quantitative fields from the same row (scores, grades, rates,
//! counts), grades the outcome on the OK scale and explains it. Datasets are
//! processed as background batch jobs that publish progress events and may
//! enrich each record with LLM-written feedback.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
