//! Event bus adapters.
//!
//! - `InMemoryEventBus` - In-process capture bus for tests and single-node runs
//! - `RedisEventPublisher` - Redis PUBLISH on a per-job channel

mod in_memory;
mod redis_publisher;

pub use in_memory::InMemoryEventBus;
pub use redis_publisher::{RedisEventPublisher, DEFAULT_CHANNEL_PREFIX};
