//! Storage adapters.
//!
//! - `InMemoryJobRepository` - Job and record storage for tests and single-node runs

mod in_memory_job_repository;

pub use in_memory_job_repository::InMemoryJobRepository;
