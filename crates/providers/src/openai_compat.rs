//! OpenAI-compatible model endpoint.
//!
//! Works with Groq, OpenAI, OpenRouter, Ollama, vLLM, and any other service
//! exposing a `/chat/completions` endpoint. The rendered prompt is sent as a
//! single user message; the response's first choice is returned as a
//! structured [`ModelResponse::Message`].
//!
//! Error mapping is what the resilient invoker keys on: a size rejection
//! becomes [`ModelError::Oversized`], everything else a transient variant.

use async_trait::async_trait;
use barrister_core::error::ModelError;
use barrister_core::model::{ModelEndpoint, ModelResponse, ResponseMessage, Usage};
use barrister_core::prompt::PromptPayload;
use serde::Deserialize;
use tracing::{debug, warn};

/// An OpenAI-compatible LLM endpoint.
pub struct OpenAiCompatEndpoint {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    client: reqwest::Client,
}

impl OpenAiCompatEndpoint {
    /// Create a new OpenAI-compatible endpoint.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: 0.0,
            client,
        }
    }

    /// Create a Groq endpoint (convenience constructor).
    pub fn groq(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new("groq", "https://api.groq.com/openai/v1", api_key, model)
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl ModelEndpoint for OpenAiCompatEndpoint {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        payload: &PromptPayload,
    ) -> std::result::Result<ModelResponse, ModelError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": payload.render() }],
            "temperature": self.temperature,
            "stream": false,
        });

        debug!(
            endpoint = %self.name,
            model = %self.model,
            context_chars = payload.context_chars(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ModelError::Timeout(e.to_string())
                } else {
                    ModelError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status != 200 {
            let retry_after = retry_after_secs(response.headers());
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Endpoint returned error");
            return Err(classify_error(status, &error_body, retry_after));
        }

        let body_text = response
            .text()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        let message = parse_completion(&body_text)?;
        Ok(ModelResponse::Message(message))
    }
}

/// Seconds from a `Retry-After` header, when present and numeric.
fn retry_after_secs(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Map a non-200 status (and its body) onto the error taxonomy.
///
/// Groq signals an oversized request with 413 (`request_too_large`); other
/// OpenAI-compatible services use a 400 whose body names the context length.
/// A 429 carries the server's `Retry-After` when it sent one.
fn classify_error(status: u16, body: &str, retry_after: Option<u64>) -> ModelError {
    let body_lower = body.to_lowercase();
    let size_rejection = body_lower.contains("request_too_large")
        || body_lower.contains("context_length")
        || body_lower.contains("too large")
        || body_lower.contains("maximum context");

    match status {
        413 => ModelError::Oversized(body.to_string()),
        400 if size_rejection => ModelError::Oversized(body.to_string()),
        429 => ModelError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(5),
        },
        401 | 403 => ModelError::AuthenticationFailed(
            "Invalid API key or insufficient permissions".into(),
        ),
        _ => ModelError::Api {
            status_code: status,
            message: body.to_string(),
        },
    }
}

/// Decode a chat-completions response body into a [`ResponseMessage`].
fn parse_completion(body: &str) -> std::result::Result<ResponseMessage, ModelError> {
    let api_response: ApiResponse = serde_json::from_str(body)
        .map_err(|e| ModelError::MalformedResponse(format!("Failed to parse response: {e}")))?;

    let choice = api_response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ModelError::MalformedResponse("No choices in response".into()))?;

    Ok(ResponseMessage {
        content: choice.message.content.unwrap_or_default(),
        model: api_response.model,
        usage: api_response.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        }),
    })
}

// --- Wire types ---

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_413_is_oversized() {
        let err = classify_error(413, r#"{"error":{"code":"request_too_large"}}"#, None);
        assert!(err.is_oversized());
    }

    #[test]
    fn status_400_with_context_length_is_oversized() {
        let err = classify_error(
            400,
            r#"{"error":{"message":"This model's maximum context length is 8192 tokens"}}"#,
            None,
        );
        assert!(err.is_oversized());
    }

    #[test]
    fn plain_400_is_transient() {
        let err = classify_error(400, r#"{"error":{"message":"invalid request"}}"#, None);
        assert!(!err.is_oversized());
        assert!(matches!(err, ModelError::Api { status_code: 400, .. }));
    }

    #[test]
    fn status_429_carries_retry_after() {
        assert!(matches!(
            classify_error(429, "", Some(17)),
            ModelError::RateLimited {
                retry_after_secs: 17
            }
        ));
        // no header: a conservative default
        assert!(matches!(
            classify_error(429, "", None),
            ModelError::RateLimited {
                retry_after_secs: 5
            }
        ));
    }

    #[test]
    fn retry_after_header_parses_numeric_seconds_only() {
        use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};

        let mut headers = HeaderMap::new();
        assert_eq!(retry_after_secs(&headers), None);

        headers.insert(RETRY_AFTER, HeaderValue::from_static("30"));
        assert_eq!(retry_after_secs(&headers), Some(30));

        // HTTP-date form is ignored rather than misparsed
        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2026 07:28:00 GMT"),
        );
        assert_eq!(retry_after_secs(&headers), None);
    }

    #[test]
    fn auth_statuses_map_to_authentication_failed() {
        assert!(matches!(
            classify_error(401, "", None),
            ModelError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            classify_error(403, "", None),
            ModelError::AuthenticationFailed(_)
        ));
    }

    #[test]
    fn parse_completion_extracts_content_and_usage() {
        let body = r#"{
            "model": "deepseek-r1-distill-llama-70b",
            "choices": [{"message": {"role": "assistant", "content": "The notice period is 60 days."}}],
            "usage": {"prompt_tokens": 120, "completion_tokens": 12, "total_tokens": 132}
        }"#;
        let message = parse_completion(body).unwrap();
        assert_eq!(message.content, "The notice period is 60 days.");
        assert_eq!(message.model.as_deref(), Some("deepseek-r1-distill-llama-70b"));
        assert_eq!(message.usage.unwrap().total_tokens, 132);
    }

    #[test]
    fn parse_completion_without_choices_is_malformed() {
        let err = parse_completion(r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, ModelError::MalformedResponse(_)));
    }

    #[test]
    fn parse_completion_rejects_bad_json() {
        let err = parse_completion("not json").unwrap_err();
        assert!(matches!(err, ModelError::MalformedResponse(_)));
    }
}
