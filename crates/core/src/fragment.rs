//! Document fragments and the retrieval collaborator trait.
//!
//! A fragment is one unit of retrieved document text. The retrieval backend
//! (vector store, keyword index, plain file splitter) produces ranked
//! fragments; this core applies no further filtering of its own.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RetrievalError;

/// A unit of retrieved document text.
///
/// `content` may be absent or empty — downstream code must skip such
/// fragments rather than fail on them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentFragment {
    /// The fragment text. Absent/empty content is tolerated everywhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Human-readable source label (file name, page, chunk index).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Relevance score assigned by the retrieval backend.
    #[serde(default)]
    pub score: f32,
}

impl DocumentFragment {
    /// Create a fragment from plain text.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            source: None,
            score: 0.0,
        }
    }

    /// Attach a source label.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Usable text of this fragment, or `None` when content is missing
    /// or empty.
    pub fn text(&self) -> Option<&str> {
        match self.content.as_deref() {
            Some(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}

/// The retrieval collaborator.
///
/// Implementations return already-filtered, ranked fragments for a query
/// against a named document. The embedding/vector backend behind this trait
/// is outside this crate's scope.
#[async_trait]
pub trait FragmentSource: Send + Sync {
    /// A human-readable name for this source (e.g. "file", "vector_store").
    fn name(&self) -> &str;

    /// Retrieve ranked fragments for `query` from the document `file_name`.
    async fn retrieve(
        &self,
        query: &str,
        file_name: &str,
    ) -> std::result::Result<Vec<DocumentFragment>, RetrievalError>;

    /// All fragments of `file_name` in document order (for summarization).
    ///
    /// Default implementation retrieves with an empty query.
    async fn load_all(
        &self,
        file_name: &str,
    ) -> std::result::Result<Vec<DocumentFragment>, RetrievalError> {
        self.retrieve("", file_name).await
    }
}
