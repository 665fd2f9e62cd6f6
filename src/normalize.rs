//! Conversational query normalization.
//!
//! Callers phrase requests as questions ("what is entropy?", "tell me about
//! black holes"); the corpus is searched with the bare subject. Normalization
//! lowercases the input, strips the known conversational templates, and
//! trims the result.

/// Conversational templates stripped from queries before corpus search.
///
/// Longer templates come first so that e.g. "how would you explain" is
/// removed as a whole rather than partially via "explain".
pub const QUERY_PHRASES: &[&str] = &[
    "what do you think about",
    "what are your thoughts on",
    "how would you explain",
    "what is",
    "tell me about",
    "explain",
];

/// Derives a bare search term from raw query text.
///
/// Removes the first occurrence of each template in [`QUERY_PHRASES`] from
/// the lowercased input and trims surrounding whitespace. If no template
/// matches, the result is simply the lowercased, trimmed input. An empty
/// result is valid: empty-substring containment matches every record, which
/// is the accepted fallback behavior.
pub fn normalize(text: &str) -> String {
    let mut term = text.to_lowercase();
    for phrase in QUERY_PHRASES {
        if let Some(pos) = term.find(phrase) {
            term.replace_range(pos..pos + phrase.len(), "");
        }
    }
    term.trim().to_string()
}
