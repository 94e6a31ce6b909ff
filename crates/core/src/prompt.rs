//! Prompt payloads and templates.
//!
//! A [`PromptPayload`] is the structured set of named string fields sent to
//! the model endpoint. The invoker replaces the payload per attempt
//! (functional update via [`PromptPayload::with_context`]) instead of
//! mutating the caller's copy in place.

use serde::{Deserialize, Serialize};

/// Template for answering a question over retrieved context and history.
pub const QUESTION_TEMPLATE: &str = "\
Use the pieces of information provided in the context and previous conversation history to answer the user's question.
If you don't know the answer, just say that you don't know, don't try to make up an answer.
Don't provide anything out of the given context.

Previous Conversation:
{history}

Question: {question}
Context: {context}
Answer:
";

/// Template for summarizing a legal document.
pub const SUMMARY_TEMPLATE: &str = "\
Summarize the given legal document concisely while preserving key legal details.
Provide a structured summary that highlights the most important points.

Document:
{context}

Summary:
";

/// Which template a payload fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptKind {
    /// Question + context + history.
    Question,
    /// Context only.
    Summary,
}

/// The structured fields sent to the model endpoint.
///
/// `question`, `context` and `history` are the only fields the templates
/// consume; `context` is additionally the truncation target of the
/// resilient invoker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptPayload {
    pub kind: PromptKind,
    pub question: String,
    pub context: String,
    pub history: String,
}

impl PromptPayload {
    /// Payload for answering `question` over `context`, with prior
    /// conversation `history`.
    pub fn question(
        question: impl Into<String>,
        context: impl Into<String>,
        history: impl Into<String>,
    ) -> Self {
        Self {
            kind: PromptKind::Question,
            question: question.into(),
            context: context.into(),
            history: history.into(),
        }
    }

    /// Context-only payload for summarization.
    pub fn summary(context: impl Into<String>) -> Self {
        Self {
            kind: PromptKind::Summary,
            question: String::new(),
            context: context.into(),
            history: String::new(),
        }
    }

    /// A new payload with the context replaced. The original is consumed;
    /// callers keep a clone if they need the pre-truncation value.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// A new payload with the context cut to at most `max_chars` characters.
    pub fn truncated_to(self, max_chars: usize) -> Self {
        let context = truncate_chars(&self.context, max_chars).to_string();
        self.with_context(context)
    }

    /// Context length in characters (the unit every budget uses).
    pub fn context_chars(&self) -> usize {
        self.context.chars().count()
    }

    /// Fill the template matching this payload's kind.
    pub fn render(&self) -> String {
        match self.kind {
            PromptKind::Question => QUESTION_TEMPLATE
                .replace("{history}", &self.history)
                .replace("{question}", &self.question)
                .replace("{context}", &self.context),
            PromptKind::Summary => SUMMARY_TEMPLATE.replace("{context}", &self.context),
        }
    }
}

/// Truncate to at most `max_chars` characters, never splitting a UTF-8
/// scalar value.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &s[..byte_index],
        None => s,
    }
}
