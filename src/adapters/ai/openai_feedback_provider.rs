//! OpenAI Feedback Provider - FeedbackProvider over an OpenAI-compatible
//! chat completions API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIFeedbackConfig::new(api_key)
//!     .with_model("gpt-4o-mini")
//!     .with_base_url("https://api.openai.com/v1");
//!
//! let provider = OpenAIFeedbackProvider::new(config)?;
//! ```
//!
//! The model is asked for a JSON object `{summary, strengths, improvements}`.
//! Retryable failures are retried with exponential backoff.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    EnrichmentError, FeedbackProvider, FeedbackRequest, FeedbackResponse, ProviderInfo,
};

/// Configuration for the OpenAI feedback provider.
#[derive(Debug, Clone)]
pub struct OpenAIFeedbackConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Default model; a job may override it.
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Timeout for one request attempt.
    pub request_timeout: Duration,
    /// Total attempts including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubled for each later one.
    pub backoff_base: Duration,
}

impl OpenAIFeedbackConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(60),
            max_attempts: 3,
            backoff_base: Duration::from_secs(1),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeouts(mut self, connect: Duration, request: Duration) -> Self {
        self.connect_timeout = connect;
        self.request_timeout = request;
        self
    }

    pub fn with_retry(mut self, max_attempts: u32, backoff_base: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.backoff_base = backoff_base;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI-compatible feedback provider.
pub struct OpenAIFeedbackProvider {
    config: OpenAIFeedbackConfig,
    client: Client,
}

impl OpenAIFeedbackProvider {
    /// Creates a provider with its own HTTP client.
    pub fn new(config: OpenAIFeedbackConfig) -> Result<Self, EnrichmentError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| EnrichmentError::InvalidRequest(format!("HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn to_openai_request(&self, request: &FeedbackRequest) -> OpenAIRequest {
        OpenAIRequest {
            model: request
                .params
                .model
                .clone()
                .unwrap_or_else(|| self.config.model.clone()),
            messages: vec![
                OpenAIMessage {
                    role: "system".to_string(),
                    content: system_prompt(&request.params.language),
                },
                OpenAIMessage {
                    role: "user".to_string(),
                    content: user_prompt(request),
                },
            ],
            max_tokens: Some(request.params.max_tokens),
            temperature: Some(request.params.temperature),
            response_format: Some(ResponseFormat {
                kind: "json_object".to_string(),
            }),
        }
    }

    async fn send_request(&self, body: &OpenAIRequest) -> Result<Response, EnrichmentError> {
        self.client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EnrichmentError::Timeout {
                        timeout_secs: self.config.request_timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    EnrichmentError::network(format!("Connection failed: {}", e))
                } else {
                    EnrichmentError::network(e.to_string())
                }
            })
    }

    /// Maps non-success statuses to enrichment errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, EnrichmentError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        Err(status_error(status.as_u16(), error_body))
    }

    async fn attempt(&self, body: &OpenAIRequest) -> Result<FeedbackResponse, EnrichmentError> {
        let response = self.send_request(body).await?;
        let response = self.handle_response_status(response).await?;

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| EnrichmentError::parse(format!("Failed to parse response: {}", e)))?;

        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| EnrichmentError::parse("No choices in response"))?;

        let payload = parse_feedback_payload(&choice.message.content)?;
        Ok(FeedbackResponse {
            summary: payload.summary,
            strengths: payload.strengths,
            improvements: payload.improvements,
            provider: "openai".to_string(),
            model: openai_response.model,
        })
    }
}

#[async_trait]
impl FeedbackProvider for OpenAIFeedbackProvider {
    async fn generate_feedback(
        &self,
        request: FeedbackRequest,
    ) -> Result<FeedbackResponse, EnrichmentError> {
        let body = self.to_openai_request(&request);
        let mut attempt = 1;

        loop {
            match self.attempt(&body).await {
                Ok(feedback) => return Ok(feedback),
                Err(err) if err.is_retryable() && attempt < self.config.max_attempts => {
                    let delay = backoff_delay(self.config.backoff_base, attempt);
                    tracing::warn!(
                        uid = %request.uid,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "feedback request failed, retrying"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("openai", self.config.model.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════════

/// Delay before retry number `attempt` (1-based): base, 2×base, 4×base, ...
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(1u32 << (attempt.saturating_sub(1)).min(16))
}

fn status_error(status: u16, body: String) -> EnrichmentError {
    match status {
        401 | 403 => EnrichmentError::AuthenticationFailed,
        429 => EnrichmentError::RateLimited {
            retry_after_secs: parse_retry_after(&body),
        },
        400 | 404 | 422 => EnrichmentError::InvalidRequest(body),
        500..=599 => EnrichmentError::unavailable(format!("Server error {}: {}", status, body)),
        _ => EnrichmentError::network(format!("Unexpected status {}: {}", status, body)),
    }
}

/// Extracts "try again in Ns" from an error body, defaulting to 30 seconds.
fn parse_retry_after(error_body: &str) -> u32 {
    serde_json::from_str::<serde_json::Value>(error_body)
        .ok()
        .and_then(|parsed| {
            let message = parsed.get("error")?.get("message")?.as_str()?.to_string();
            let rest = &message[message.find("try again in ")? + 13..];
            let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
            rest[..end].parse::<u32>().ok()
        })
        .unwrap_or(30)
}

fn system_prompt(language: &str) -> String {
    let language_name = match language {
        "ko" => "Korean",
        "en" => "English",
        "ja" => "Japanese",
        other => other,
    };
    format!(
        "You are an HR analyst writing concise, constructive feedback about an employee \
         based on a peer opinion and its computed evaluation. Respond in {} with a JSON object \
         of the form {{\"summary\": string, \"strengths\": [string], \"improvements\": [string]}}. \
         Keep at most three items per list.",
        language_name
    )
}

fn user_prompt(request: &FeedbackRequest) -> String {
    format!(
        "Employee: {}\nOverall score: {:.1} ({})\nStrength areas: {}\nWeak areas: {}\nOpinion:\n{}",
        request.uid,
        request.overall_score,
        request.grade,
        list_or_none(&request.strengths),
        list_or_none(&request.weaknesses),
        request.opinion,
    )
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

/// Parses the model output, tolerating a surrounding Markdown code fence.
fn parse_feedback_payload(content: &str) -> Result<FeedbackPayload, EnrichmentError> {
    let trimmed = content.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);

    let payload: FeedbackPayload = serde_json::from_str(unfenced.trim())
        .map_err(|e| EnrichmentError::parse(format!("Feedback is not valid JSON: {}", e)))?;

    if payload.summary.trim().is_empty() {
        return Err(EnrichmentError::parse("Feedback summary is empty"));
    }
    Ok(payload)
}

// ════════════════════════════════════════════════════════════════════════════════
// OpenAI API Types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    model: String,
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
struct FeedbackPayload {
    summary: String,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    improvements: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::job::EnrichmentParams;
    use crate::domain::scoring::OkGrade;

    fn request() -> FeedbackRequest {
        FeedbackRequest {
            uid: "E001".to_string(),
            opinion: "리더십이 뛰어납니다".to_string(),
            overall_score: 86.44,
            grade: OkGrade::OneStar,
            strengths: vec!["리더십".to_string()],
            weaknesses: vec![],
            params: EnrichmentParams::default(),
        }
    }

    #[test]
    fn config_builder_works() {
        let config = OpenAIFeedbackConfig::new("sk-test")
            .with_model("gpt-4o")
            .with_base_url("http://localhost:8080/v1/")
            .with_retry(0, Duration::from_millis(10));

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_attempts, 1);
        assert_eq!(config.api_key(), "sk-test");

        let provider = OpenAIFeedbackProvider::new(config).unwrap();
        assert_eq!(provider.completions_url(), "http://localhost:8080/v1/chat/completions");
        assert_eq!(provider.provider_info().model, "gpt-4o");
    }

    #[test]
    fn request_uses_job_model_override() {
        let provider = OpenAIFeedbackProvider::new(OpenAIFeedbackConfig::new("k")).unwrap();
        let mut req = request();
        assert_eq!(provider.to_openai_request(&req).model, "gpt-4o-mini");

        req.params.model = Some("gpt-4o".to_string());
        let body = provider.to_openai_request(&req);
        assert_eq!(body.model, "gpt-4o");
        assert_eq!(body.messages.len(), 2);
        assert!(body.messages[1].content.contains("86.4 (OK★)"));
        assert!(body.messages[1].content.contains("Weak areas: none"));
        assert!(body.messages[0].content.contains("Korean"));
    }

    #[test]
    fn backoff_doubles() {
        let base = Duration::from_secs(1);
        assert_eq!(backoff_delay(base, 1), Duration::from_secs(1));
        assert_eq!(backoff_delay(base, 2), Duration::from_secs(2));
        assert_eq!(backoff_delay(base, 3), Duration::from_secs(4));
    }

    #[test]
    fn status_mapping() {
        assert_eq!(status_error(401, String::new()), EnrichmentError::AuthenticationFailed);
        assert!(matches!(status_error(503, "down".into()), EnrichmentError::Unavailable { .. }));
        assert!(matches!(status_error(400, "bad".into()), EnrichmentError::InvalidRequest(_)));
        assert_eq!(
            status_error(429, r#"{"error":{"message":"Rate limit. Please try again in 7s."}}"#.into()),
            EnrichmentError::RateLimited { retry_after_secs: 7 }
        );
        assert_eq!(
            status_error(429, "not json".into()),
            EnrichmentError::RateLimited { retry_after_secs: 30 }
        );
    }

    #[test]
    fn parses_plain_and_fenced_payloads() {
        let plain = parse_feedback_payload(
            r#"{"summary":"좋은 리더","strengths":["비전 제시"],"improvements":[]}"#,
        )
        .unwrap();
        assert_eq!(plain.summary, "좋은 리더");
        assert_eq!(plain.strengths, vec!["비전 제시"]);

        let fenced = parse_feedback_payload("```json\n{\"summary\":\"ok\"}\n```").unwrap();
        assert_eq!(fenced.summary, "ok");
        assert!(fenced.improvements.is_empty());
    }

    #[test]
    fn rejects_invalid_payloads() {
        assert!(matches!(
            parse_feedback_payload("I cannot help with that"),
            Err(EnrichmentError::Parse(_))
        ));
        assert!(matches!(
            parse_feedback_payload(r#"{"summary":"  "}"#),
            Err(EnrichmentError::Parse(_))
        ));
    }
}
