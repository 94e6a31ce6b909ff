//! Error types for the barrister domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; `Error` is the top-level
//! type the services and CLI work with.

use thiserror::Error;

/// The top-level error type for all barrister operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Model endpoint errors ---
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// The resilient invoker gave up after exhausting its retry budget.
    /// Always carries the last underlying model error.
    #[error("Retries exhausted after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: ModelError,
    },

    // --- Retrieval errors ---
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    // --- Report errors ---
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True when the retry budget was exhausted by oversized rejections,
    /// i.e. the request stayed too large no matter how much the context
    /// was trimmed.
    pub fn is_oversized_exhaustion(&self) -> bool {
        matches!(
            self,
            Error::RetriesExhausted { source, .. } if source.is_oversized()
        )
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures from the hosted model endpoint.
///
/// The invoker only distinguishes two classes: [`ModelError::Oversized`]
/// (shrink the context and retry) and everything else (retry unchanged).
/// The finer variants exist so logs and user-facing messages stay useful.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("Request rejected as too large: {0}")]
    Oversized(String),

    #[error("API request failed: {message} (status: {status_code})")]
    Api { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ModelError {
    /// The provider rejected the request because the payload exceeds its
    /// size limits. Every other variant is treated as transient.
    pub fn is_oversized(&self) -> bool {
        matches!(self, ModelError::Oversized(_))
    }
}

#[derive(Debug, Clone, Error)]
pub enum RetrievalError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),
}

#[derive(Debug, Error)]
pub enum ReportError {
    /// Precondition violation: the transcript must pair every question
    /// with exactly one answer.
    #[error("Question/answer count mismatch: {questions} questions, {answers} answers")]
    LengthMismatch { questions: usize, answers: usize },

    #[error("Failed to render PDF: {0}")]
    Render(String),

    #[error("Failed to write report file: {0}")]
    Io(String),
}
