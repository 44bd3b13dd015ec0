//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Feedback providers (OpenAI-compatible, mock)
//! - `dataset` - Dataset sources (CSV directory, in-memory)
//! - `events` - Event bus implementations (in-memory, Redis)
//! - `http` - REST API (axum)
//! - `postgres` - PostgreSQL job store
//! - `storage` - In-memory job store

pub mod ai;
pub mod dataset;
pub mod events;
pub mod http;
pub mod postgres;
pub mod storage;

pub use ai::{MockFeedbackProvider, OpenAIFeedbackConfig, OpenAIFeedbackProvider};
pub use dataset::{CsvDirectorySource, InMemoryDatasetSource};
pub use events::{InMemoryEventBus, RedisEventPublisher};
pub use postgres::PostgresJobRepository;
pub use storage::InMemoryJobRepository;
