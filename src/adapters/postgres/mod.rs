//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresJobRepository` - Analysis jobs and their records

mod job_repository;

pub use job_repository::PostgresJobRepository;
