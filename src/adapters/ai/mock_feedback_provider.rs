//! Mock Feedback Provider for testing.
//!
//! # Features
//!
//! - Pre-configured responses, consumed in call order
//! - Error injection and hanging calls for deadline testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockFeedbackProvider::new()
//!     .with_feedback("Strong leader")
//!     .with_error(EnrichmentError::AuthenticationFailed);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    EnrichmentError, FeedbackProvider, FeedbackRequest, FeedbackResponse, ProviderInfo,
};

/// A configured mock outcome.
#[derive(Debug, Clone)]
pub enum MockFeedback {
    /// Return feedback with this summary.
    Success { summary: String },
    /// Return an error.
    Error(EnrichmentError),
    /// Sleep this long, then return the default feedback.
    Hang(Duration),
}

/// Mock feedback provider.
#[derive(Debug, Clone)]
pub struct MockFeedbackProvider {
    responses: Arc<Mutex<VecDeque<MockFeedback>>>,
    info: ProviderInfo,
    delay: Duration,
    calls: Arc<Mutex<Vec<FeedbackRequest>>>,
}

impl Default for MockFeedbackProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockFeedbackProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            info: ProviderInfo::new("mock", "mock-feedback-1"),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a successful response.
    pub fn with_feedback(self, summary: impl Into<String>) -> Self {
        self.push(MockFeedback::Success {
            summary: summary.into(),
        })
    }

    /// Queues an error response.
    pub fn with_error(self, error: EnrichmentError) -> Self {
        self.push(MockFeedback::Error(error))
    }

    /// Queues a call that sleeps for `duration` before answering.
    pub fn with_hang(self, duration: Duration) -> Self {
        self.push(MockFeedback::Hang(duration))
    }

    /// Sets simulated latency for every request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn push(self, response: MockFeedback) -> Self {
        lock(&self.responses).push_back(response);
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns all recorded requests.
    pub fn get_calls(&self) -> Vec<FeedbackRequest> {
        lock(&self.calls).clone()
    }

    fn next_response(&self) -> MockFeedback {
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| MockFeedback::Success {
                summary: "Mock feedback".to_string(),
            })
    }

    fn feedback(&self, summary: String) -> FeedbackResponse {
        FeedbackResponse {
            summary,
            strengths: vec!["mock strength".to_string()],
            improvements: vec!["mock improvement".to_string()],
            provider: self.info.name.clone(),
            model: self.info.model.clone(),
        }
    }
}

#[async_trait]
impl FeedbackProvider for MockFeedbackProvider {
    async fn generate_feedback(
        &self,
        request: FeedbackRequest,
    ) -> Result<FeedbackResponse, EnrichmentError> {
        lock(&self.calls).push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockFeedback::Success { summary } => Ok(self.feedback(summary)),
            MockFeedback::Error(err) => Err(err),
            MockFeedback::Hang(duration) => {
                sleep(duration).await;
                Ok(self.feedback("Mock feedback".to_string()))
            }
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::job::EnrichmentParams;
    use crate::domain::scoring::OkGrade;

    fn request(uid: &str) -> FeedbackRequest {
        FeedbackRequest {
            uid: uid.to_string(),
            opinion: "성실합니다".to_string(),
            overall_score: 70.0,
            grade: OkGrade::B,
            strengths: vec![],
            weaknesses: vec![],
            params: EnrichmentParams::default(),
        }
    }

    #[tokio::test]
    async fn responses_are_consumed_in_order() {
        let provider = MockFeedbackProvider::new()
            .with_feedback("first")
            .with_error(EnrichmentError::AuthenticationFailed);

        let first = provider.generate_feedback(request("E1")).await.unwrap();
        assert_eq!(first.summary, "first");
        assert_eq!(first.provider, "mock");

        let second = provider.generate_feedback(request("E2")).await.unwrap_err();
        assert_eq!(second, EnrichmentError::AuthenticationFailed);

        let third = provider.generate_feedback(request("E3")).await.unwrap();
        assert_eq!(third.summary, "Mock feedback");
    }

    #[tokio::test]
    async fn records_calls() {
        let provider = MockFeedbackProvider::new();
        provider.generate_feedback(request("E9")).await.unwrap();

        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.get_calls()[0].uid, "E9");
    }

    #[tokio::test]
    async fn hang_delays_the_answer() {
        let provider = MockFeedbackProvider::new().with_hang(Duration::from_millis(200));
        let result = tokio::time::timeout(
            Duration::from_millis(20),
            provider.generate_feedback(request("E1")),
        )
        .await;
        assert!(result.is_err());
    }
}
