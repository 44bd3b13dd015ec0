//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `JobRepository` - Authoritative store for jobs and their records
//! - `EventPublisher` - Progress / completion event channel
//! - `DatasetSource` - Loads uploaded datasets by reference
//! - `FeedbackProvider` - LLM narrative feedback enrichment

mod dataset_source;
mod event_publisher;
mod feedback_provider;
mod job_repository;

pub use dataset_source::{DatasetError, DatasetSource};
pub use event_publisher::EventPublisher;
pub use feedback_provider::{
    EnrichmentError, FeedbackProvider, FeedbackRequest, FeedbackResponse, ProviderInfo,
};
pub use job_repository::JobRepository;
