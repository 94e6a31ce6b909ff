//! Context assembly — joins retrieved fragments into one bounded string.

use barrister_core::fragment::DocumentFragment;
use barrister_core::prompt::truncate_chars;

/// Paragraph separator between fragment texts.
const SEPARATOR: &str = "\n\n";

/// Build a single context string from retrieved fragments.
///
/// Fragments with missing or empty content are skipped, not treated as
/// errors. Surviving texts are joined in their original order; if
/// `max_chars` is given and exceeded, the result is hard-truncated to
/// exactly `max_chars` characters (no attempt to cut at a word boundary).
///
/// Returns `""` when the input yields no usable content. Never fails.
pub fn build_context(fragments: &[DocumentFragment], max_chars: Option<usize>) -> String {
    let texts: Vec<&str> = fragments.iter().filter_map(|f| f.text()).collect();
    let context = texts.join(SEPARATOR);

    match max_chars {
        Some(limit) if context.chars().count() > limit => {
            truncate_chars(&context, limit).to_string()
        }
        _ => context,
    }
}
