//! In-memory event bus implementation.
//!
//! Captures every published envelope for inspection. Used by tests and by
//! the server when no Redis URL is configured.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::EventPublisher;

/// In-memory event bus.
///
/// Features:
/// - Event capture for assertions
/// - Optional forced failures to exercise fire-and-forget callers
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(InMemoryEventBus::new());
/// bus.publish(envelope).await?;
///
/// assert_eq!(bus.event_count(), 1);
/// assert!(bus.has_event("analysis_job.completed.v1"));
/// ```
pub struct InMemoryEventBus {
    published: Mutex<Vec<EventEnvelope>>,
    fail_publishes: AtomicBool,
}

impl InMemoryEventBus {
    /// Creates a new empty event bus.
    pub fn new() -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            fail_publishes: AtomicBool::new(false),
        }
    }

    /// Creates a bus whose every publish fails without recording the event.
    pub fn failing() -> Self {
        let bus = Self::new();
        bus.set_failing(true);
        bus
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_publishes.store(failing, Ordering::SeqCst);
    }

    // A poisoned lock only means another publisher panicked mid-push; the
    // captured events are still valid.
    fn events(&self) -> MutexGuard<'_, Vec<EventEnvelope>> {
        self.published.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // === Test Helpers ===

    /// Returns all published events in publish order.
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.events().clone()
    }

    /// Returns events of a specific type.
    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.events()
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    /// Returns events for a specific aggregate (job id).
    pub fn events_for_aggregate(&self, aggregate_id: &str) -> Vec<EventEnvelope> {
        self.events()
            .iter()
            .filter(|e| e.aggregate_id == aggregate_id)
            .cloned()
            .collect()
    }

    /// Clears all published events.
    pub fn clear(&self) {
        self.events().clear();
    }

    pub fn event_count(&self) -> usize {
        self.events().len()
    }

    /// Checks if a specific event type was published.
    pub fn has_event(&self, event_type: &str) -> bool {
        self.events().iter().any(|e| e.event_type == event_type)
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        if self.fail_publishes.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::PublishFailed,
                format!("in-memory bus rejected {}", event.event_type),
            ));
        }
        self.events().push(event);
        Ok(())
    }

    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}
