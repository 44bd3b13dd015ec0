//! Analysis job status state machine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Lifecycle of an analysis job.
///
/// A job is created directly in `Processing`; there is no separate pending state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Rows are being analysed.
    Processing,

    /// Every row was attempted.
    Completed,

    /// A job-level error stopped the run before or outside the row loop.
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(JobStatus::Processing),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            other => Err(format!("unknown job status: {}", other)),
        }
    }
}

impl StateMachine for JobStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use JobStatus::*;
        matches!((self, target), (Processing, Completed) | (Processing, Failed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use JobStatus::*;
        match self {
            Processing => vec![Completed, Failed],
            Completed | Failed => vec![],
        }
    }
}
