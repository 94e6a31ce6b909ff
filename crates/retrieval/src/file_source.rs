//! Paragraph-splitting fragment source over plain text files.

use async_trait::async_trait;
use barrister_core::error::RetrievalError;
use barrister_core::fragment::{DocumentFragment, FragmentSource};
use std::path::PathBuf;
use tracing::debug;

/// A fragment source that reads documents from a directory and splits them
/// into paragraph fragments (blank-line separated).
///
/// Queries are ranked by a simple keyword relevance score; an empty query
/// returns every paragraph in document order, which is what summarization
/// wants.
pub struct FileFragmentSource {
    root: PathBuf,
    limit: usize,
}

impl FileFragmentSource {
    /// Create a source rooted at `root`, returning at most `limit`
    /// fragments per ranked query.
    pub fn new(root: impl Into<PathBuf>, limit: usize) -> Self {
        Self {
            root: root.into(),
            limit,
        }
    }

    fn split_paragraphs(content: &str, file_name: &str) -> Vec<DocumentFragment> {
        content
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .enumerate()
            .map(|(index, paragraph)| {
                DocumentFragment::new(paragraph).with_source(format!("{file_name}#{index}"))
            })
            .collect()
    }

    async fn read_document(&self, file_name: &str) -> Result<String, RetrievalError> {
        let path = self.root.join(file_name);
        tokio::fs::read_to_string(&path).await.map_err(|e| {
            RetrievalError::Storage(format!("Failed to read {}: {e}", path.display()))
        })
    }
}

/// Keyword relevance: occurrences of each query term, normalized by
/// paragraph length per 100 chars.
fn relevance_score(paragraph: &str, terms: &[String]) -> f32 {
    let paragraph_lower = paragraph.to_lowercase();
    let occurrences: usize = terms
        .iter()
        .map(|term| paragraph_lower.matches(term.as_str()).count())
        .sum();
    occurrences as f32 / (paragraph.len() as f32 / 100.0).max(1.0)
}

#[async_trait]
impl FragmentSource for FileFragmentSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn retrieve(
        &self,
        query: &str,
        file_name: &str,
    ) -> std::result::Result<Vec<DocumentFragment>, RetrievalError> {
        let content = self.read_document(file_name).await?;
        let mut fragments = Self::split_paragraphs(&content, file_name);

        let terms: Vec<String> = query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();

        if terms.is_empty() {
            debug!(file = file_name, fragments = fragments.len(), "Loaded document in order");
            return Ok(fragments);
        }

        for fragment in &mut fragments {
            if let Some(text) = fragment.text() {
                fragment.score = relevance_score(text, &terms);
            }
        }

        fragments.retain(|f| f.score > 0.0);
        fragments.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        fragments.truncate(self.limit);

        debug!(
            file = file_name,
            query,
            returned = fragments.len(),
            "Ranked fragments for query"
        );
        Ok(fragments)
    }
}
