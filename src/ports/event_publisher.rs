//! EventPublisher port - Interface for publishing job progress events.
//!
//! This port defines how the orchestrator publishes events without knowing
//! about the underlying transport mechanism (in-memory, Redis, etc.).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing domain events.
///
/// Callers treat publishing as fire-and-forget: a returned error is logged by
/// the caller and never aborts the work that produced the event.
///
/// # Example
///
/// ```ignore
/// let envelope = JobProgressed::from_job(&job, row, true).to_envelope()?;
/// publisher.publish(envelope).await?;
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Publish multiple events in order.
    ///
    /// Adapters without batch support publish sequentially and stop at the
    /// first failure.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_publisher_is_object_safe() {
        fn _accepts_dyn(_publisher: &dyn EventPublisher) {}
    }
}
