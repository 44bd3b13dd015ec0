//! Redis PUBLISH adapter for job events.
//!
//! Each envelope is published as JSON on `{prefix}:{aggregate_id}`, so a
//! client interested in one job subscribes to a single channel.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::EventPublisher;

/// Default channel prefix for analysis job events.
pub const DEFAULT_CHANNEL_PREFIX: &str = "analysis-jobs";

/// Redis-backed event publisher.
#[derive(Clone)]
pub struct RedisEventPublisher {
    conn: MultiplexedConnection,
    channel_prefix: String,
}

impl RedisEventPublisher {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self {
            conn,
            channel_prefix: DEFAULT_CHANNEL_PREFIX.to_string(),
        }
    }

    pub fn with_channel_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.channel_prefix = prefix.into();
        self
    }

    /// Connect to Redis and build a publisher.
    pub async fn connect(url: &str) -> Result<Self, DomainError> {
        let client = redis::Client::open(url).map_err(|e| {
            DomainError::new(ErrorCode::PublishFailed, format!("Invalid Redis URL: {}", e))
        })?;
        let conn = client.get_multiplexed_tokio_connection().await.map_err(|e| {
            DomainError::new(ErrorCode::PublishFailed, format!("Redis connection failed: {}", e))
        })?;
        Ok(Self::new(conn))
    }

    pub fn channel_for(&self, aggregate_id: &str) -> String {
        channel_name(&self.channel_prefix, aggregate_id)
    }
}

fn channel_name(prefix: &str, aggregate_id: &str) -> String {
    format!("{}:{}", prefix, aggregate_id)
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let channel = self.channel_for(&event.aggregate_id);
        let payload = serde_json::to_string(&event).map_err(|e| {
            DomainError::new(ErrorCode::PublishFailed, format!("Failed to encode event: {}", e))
        })?;

        let mut conn = self.conn.clone();
        let receivers: i64 = conn
            .publish(&channel, payload)
            .await
            .map_err(|e: redis::RedisError| {
                DomainError::new(ErrorCode::PublishFailed, format!("Redis PUBLISH failed: {}", e))
                    .with_detail("channel", channel.clone())
            })?;

        tracing::trace!(channel = %channel, receivers, event_type = %event.event_type, "event published");
        Ok(())
    }

    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_is_scoped_by_job() {
        assert_eq!(
            channel_name(DEFAULT_CHANNEL_PREFIX, "0b6f4f0e-2a4c-4a51-9a52-2f3a3c1d9e10"),
            "analysis-jobs:0b6f4f0e-2a4c-4a51-9a52-2f3a3c1d9e10"
        );
        assert_eq!(channel_name("custom", "abc"), "custom:abc");
    }

    #[tokio::test]
    async fn connect_rejects_invalid_url() {
        let err = RedisEventPublisher::connect("not a url").await.err().unwrap();
        assert_eq!(err.code, ErrorCode::PublishFailed);
    }
}
