//! LLM feedback adapters.
//!
//! - `OpenAIFeedbackProvider` - OpenAI-compatible chat completions with retry
//! - `MockFeedbackProvider` - Scripted provider for tests

mod mock_feedback_provider;
mod openai_feedback_provider;

pub use mock_feedback_provider::{MockFeedback, MockFeedbackProvider};
pub use openai_feedback_provider::{OpenAIFeedbackConfig, OpenAIFeedbackProvider};
