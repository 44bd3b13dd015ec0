//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, events, state machine support, and error types
//! that form the vocabulary of the scoring domain.

mod errors;
mod events;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{
    DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::JobId;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
