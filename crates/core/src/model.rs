//! The model endpoint trait — the abstraction over hosted LLM backends.
//!
//! The resilient invoker calls `generate()` without knowing which provider
//! is behind it, which is also what makes the retry loop testable with a
//! fake endpoint that fails deterministically on attempt N.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::prompt::PromptPayload;

/// A response from the model endpoint.
///
/// Providers differ in call convention: some return a bare string, some a
/// structured message exposing a textual content field. Both forms are
/// carried here and [`ModelResponse::text`] reads either.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelResponse {
    /// A plain answer string.
    Text(String),
    /// A structured response with a content field and metadata.
    Message(ResponseMessage),
}

impl ModelResponse {
    /// The textual content, regardless of response form.
    pub fn text(&self) -> &str {
        match self {
            ModelResponse::Text(text) => text,
            ModelResponse::Message(message) => &message.content,
        }
    }

    /// Consume the response, yielding its textual content.
    pub fn into_text(self) -> String {
        match self {
            ModelResponse::Text(text) => text,
            ModelResponse::Message(message) => message.content,
        }
    }
}

impl From<String> for ModelResponse {
    fn from(text: String) -> Self {
        ModelResponse::Text(text)
    }
}

impl From<&str> for ModelResponse {
    fn from(text: &str) -> Self {
        ModelResponse::Text(text.to_string())
    }
}

/// A structured model response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMessage {
    /// The generated text.
    pub content: String,

    /// Which model actually responded (may differ from requested).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Token usage statistics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The model endpoint collaborator.
///
/// One `generate` call is one request to the hosted model. The endpoint
/// owns its own transport-level timeouts; the invoker above it owns the
/// retry policy.
#[async_trait]
pub trait ModelEndpoint: Send + Sync {
    /// A human-readable name for this endpoint (e.g. "groq").
    fn name(&self) -> &str;

    /// Submit a prompt payload and return the model's response.
    async fn generate(
        &self,
        payload: &PromptPayload,
    ) -> std::result::Result<ModelResponse, ModelError>;
}
