//! Job domain - the analysis job aggregate, its lifecycle and events.

mod aggregate;
mod events;
mod params;
mod status;

pub use aggregate::Job;
pub use events::{JobCompleted, JobFailed, JobProgressed};
pub use params::{EnrichmentParams, JobParams, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
pub use status::JobStatus;
