//! Source documents handed from the fetcher to the generation prompt.

use serde::{Deserialize, Serialize};

/// Maximum number of characters kept from any source document.
pub const MAX_CONTENT_CHARS: usize = 10_000;

/// Where a document came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DocumentOrigin {
    /// Fetched from this URL
    Url(String),
    /// Supplied literally by the caller
    RawText,
}

impl DocumentOrigin {
    /// Label shown on the rendered graph page.
    pub fn label(&self) -> &str {
        match self {
            Self::Url(url) => url,
            Self::RawText => "text input",
        }
    }
}

/// Fetched document content, capped at [`MAX_CONTENT_CHARS`].
///
/// Immutable once built. `truncated` tells downstream stages that the tail
/// was dropped; no attempt is made to cut at a sentence boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    origin: DocumentOrigin,
    content: String,
    truncated: bool,
}

impl SourceDocument {
    /// Build a document, truncating `content` to the first
    /// [`MAX_CONTENT_CHARS`] characters.
    pub fn new(origin: DocumentOrigin, content: impl Into<String>) -> Self {
        let (content, truncated) = truncate_chars(content.into(), MAX_CONTENT_CHARS);
        Self {
            origin,
            content,
            truncated,
        }
    }

    /// Document built from caller-supplied text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(DocumentOrigin::RawText, text)
    }

    pub fn origin(&self) -> &DocumentOrigin {
        &self.origin
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Length in characters (not bytes).
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Keep the first `max` characters of `text`. Returns whether anything was cut.
fn truncate_chars(mut text: String, max: usize) -> (String, bool) {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => {
            text.truncate(byte_idx);
            (text, true)
        }
        None => (text, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_text_is_cut_to_limit() {
        let text = "字".repeat(MAX_CONTENT_CHARS + 250);
        let doc = SourceDocument::from_text(text);

        assert!(doc.truncated());
        assert_eq!(doc.char_len(), MAX_CONTENT_CHARS);
    }

    #[test]
    fn test_short_text_is_unchanged() {
        let doc = SourceDocument::from_text("學生每天去圖書館看書。");

        assert!(!doc.truncated());
        assert_eq!(doc.content(), "學生每天去圖書館看書。");
    }

    #[test]
    fn test_exact_limit_is_not_truncated() {
        let text = "a".repeat(MAX_CONTENT_CHARS);
        let doc = SourceDocument::from_text(text.clone());

        assert!(!doc.truncated());
        assert_eq!(doc.content(), text);
    }

    #[test]
    fn test_origin_label() {
        let doc = SourceDocument::new(DocumentOrigin::Url("https://example.com".into()), "x");
        assert_eq!(doc.origin().label(), "https://example.com");
        assert_eq!(DocumentOrigin::RawText.label(), "text input");
    }
}
