//! Answer and summarize services — the two call sites of the resilient
//! invoker.
//!
//! Both convert any final failure into a human-readable string embedded in
//! the normal return channel. They never raise to their caller.

use std::sync::Arc;

use barrister_core::fragment::DocumentFragment;
use barrister_core::model::ModelEndpoint;
use barrister_core::prompt::PromptPayload;
use tracing::info;

use crate::context::build_context;
use crate::invoke::{invoke, RetryPolicy};

/// Context character budget when answering a question.
pub const ANSWER_CONTEXT_CHARS: usize = 16_000;

/// Context character budget when summarizing (smaller, to be extra safe).
pub const SUMMARY_CONTEXT_CHARS: usize = 12_000;

/// Returned by `summarize` when the fragments yield no usable text; the
/// model is not called in that case.
pub const NO_CONTENT_MESSAGE: &str = "No document text could be extracted to summarize.";

/// Question-answering and summarization over retrieved fragments.
pub struct QaService {
    endpoint: Arc<dyn ModelEndpoint>,
    policy: RetryPolicy,
    answer_max_chars: usize,
    summary_max_chars: usize,
}

impl QaService {
    /// Create a service with the default retry policy and context budgets.
    pub fn new(endpoint: Arc<dyn ModelEndpoint>) -> Self {
        Self {
            endpoint,
            policy: RetryPolicy::default(),
            answer_max_chars: ANSWER_CONTEXT_CHARS,
            summary_max_chars: SUMMARY_CONTEXT_CHARS,
        }
    }

    /// Override the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Override the context budgets.
    pub fn with_budgets(mut self, answer_max_chars: usize, summary_max_chars: usize) -> Self {
        self.answer_max_chars = answer_max_chars;
        self.summary_max_chars = summary_max_chars;
        self
    }

    /// Answer `query` using retrieved fragments and prior conversation
    /// history. A final invocation failure is reported as a descriptive
    /// string rather than an error.
    pub async fn answer(
        &self,
        fragments: &[DocumentFragment],
        query: &str,
        history: &str,
    ) -> String {
        let context = build_context(fragments, Some(self.answer_max_chars));
        info!(
            fragments = fragments.len(),
            context_chars = context.chars().count(),
            "Answering question"
        );

        let payload = PromptPayload::question(query, context, history);
        match invoke(self.endpoint.as_ref(), payload, &self.policy).await {
            Ok(response) => response.into_text(),
            Err(err) => format!("Failed to get an answer from the model: {err}"),
        }
    }

    /// Summarize the given document fragments concisely.
    ///
    /// Returns [`NO_CONTENT_MESSAGE`] without calling the model when no
    /// usable text can be extracted. Failure strings distinguish a request
    /// that stayed oversized through every retry from other failures.
    pub async fn summarize(&self, fragments: &[DocumentFragment]) -> String {
        let context = build_context(fragments, Some(self.summary_max_chars));
        if context.is_empty() {
            return NO_CONTENT_MESSAGE.to_string();
        }
        info!(
            fragments = fragments.len(),
            context_chars = context.chars().count(),
            "Summarizing document"
        );

        let payload = PromptPayload::summary(context);
        match invoke(self.endpoint.as_ref(), payload, &self.policy).await {
            Ok(response) => response.into_text(),
            Err(err) if err.is_oversized_exhaustion() => format!(
                "Could not summarize: the request was still too large after retries. \
                 Check the configured model and its parameters. ({err})"
            ),
            Err(err) => format!("Could not summarize the document: {err}"),
        }
    }
}
