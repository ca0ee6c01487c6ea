//! Match-context extraction.
//!
//! Given a document's text and a query, finds the first case-insensitive
//! occurrence of the query and cuts a window of surrounding context with the
//! match span wrapped in highlight markers. When no span can be located the
//! extractor degrades to a plain leading excerpt; it never fails.
//!
//! All positions are character (Unicode scalar) indices, so a window edge can
//! never land inside a multi-byte code point.
//!
//! # Case folding
//!
//! Folding lower-cases one character at a time and keeps any character whose
//! lower-case form expands to more than one character (for example `İ`). This
//! keeps folded and original text index-aligned, at the cost of not being
//! locale-aware. The corpus is overwhelmingly ASCII, where the fold is exact.

use crate::models::Snippet;

/// Characters of context kept on each side of a match.
pub const DEFAULT_WINDOW: usize = 200;

/// Length of the excerpt returned when no match span is found.
pub const DEFAULT_FALLBACK_CHARS: usize = 400;

/// Strings placed around the highlighted match span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    pub open: String,
    pub close: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            open: "**".to_string(),
            close: "**".to_string(),
        }
    }
}

/// Configured context extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extractor {
    pub window: usize,
    pub fallback_chars: usize,
    pub markers: Markers,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            fallback_chars: DEFAULT_FALLBACK_CHARS,
            markers: Markers::default(),
        }
    }
}

impl Extractor {
    /// Build the snippet for `text` around the first occurrence of `query`.
    pub fn extract(&self, text: &str, query: &str) -> Snippet {
        if query.is_empty() {
            return self.fallback(text);
        }
        let idx = match find_folded(text, query) {
            Some(idx) => idx,
            None => return self.fallback(text),
        };

        let query_len = query.chars().count();
        let total = text.chars().count();
        let start = idx.saturating_sub(self.window);
        let end = idx
            .saturating_add(query_len)
            .saturating_add(self.window)
            .min(total);

        let start_b = byte_offset(text, start);
        let match_start_b = byte_offset(text, idx);
        let match_end_b = byte_offset(text, idx + query_len);
        let end_b = byte_offset(text, end);

        let mut highlighted = String::with_capacity(
            end_b - start_b + self.markers.open.len() + self.markers.close.len(),
        );
        highlighted.push_str(&text[start_b..match_start_b]);
        highlighted.push_str(&self.markers.open);
        highlighted.push_str(&text[match_start_b..match_end_b]);
        highlighted.push_str(&self.markers.close);
        highlighted.push_str(&text[match_end_b..end_b]);

        Snippet {
            highlighted,
            matched: true,
        }
    }

    fn fallback(&self, text: &str) -> Snippet {
        Snippet {
            highlighted: text[..byte_offset(text, self.fallback_chars)].to_string(),
            matched: false,
        }
    }
}

/// Extract with the given window and default markers and fallback length.
pub fn extract(text: &str, query: &str, window: usize) -> Snippet {
    Extractor {
        window,
        ..Extractor::default()
    }
    .extract(text, query)
}

/// Lower-case a single character, keeping it unchanged when its lower-case
/// form is not a single character.
pub fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Fold a whole string. The result has exactly as many characters as `s`.
pub fn fold(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

/// Character index of the first case-insensitive occurrence of `query` in `text`.
pub fn find_folded(text: &str, query: &str) -> Option<usize> {
    let haystack = fold(text);
    let needle = fold(query);
    haystack
        .find(&needle)
        .map(|byte_idx| haystack[..byte_idx].chars().count())
}

/// Whether `text` contains `query` case-insensitively.
pub fn contains_folded(text: &str, query: &str) -> bool {
    fold(text).contains(&fold(query))
}

/// Byte offset of the `n`th character, clamped to the end of `text`.
fn byte_offset(text: &str, n: usize) -> usize {
    text.char_indices()
        .nth(n)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
