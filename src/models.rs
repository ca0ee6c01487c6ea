//! Core data models shared by the corpus reader, the search driver, and the
//! command/HTTP surfaces.
//!
//! Everything here is read from the database; nothing is ever written back.

use serde::Serialize;

/// One ingested file's metadata plus its extracted text, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: i64,
    pub filename: String,
    pub dataset: i64,
    pub rel_path: String,
    pub extracted_text: Option<String>,
    /// Stored character count. Trusted for display; matching works on the text.
    pub char_count: i64,
    /// Extraction method recorded by the ingestion pipeline (`pdftotext`, `ocr`, ...).
    pub method: Option<String>,
}

impl Document {
    /// The extracted text, or `""` when none was extracted.
    pub fn text(&self) -> &str {
        self.extracted_text.as_deref().unwrap_or("")
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            id: self.id,
            filename: self.filename.clone(),
            dataset: self.dataset,
            rel_path: self.rel_path.clone(),
            char_count: self.char_count,
        }
    }
}

/// Document metadata without the body text, carried by each search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSummary {
    pub id: i64,
    pub filename: String,
    pub dataset: i64,
    pub rel_path: String,
    pub char_count: i64,
}

/// A bounded excerpt of a document with the match span optionally marked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snippet {
    pub highlighted: String,
    /// `true` when a genuine match span was located, `false` for the fallback excerpt.
    pub matched: bool,
}

/// A search hit: the matching document plus its snippet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub document: DocumentSummary,
    pub snippet: String,
    pub matched: bool,
}

impl MatchResult {
    pub fn new(document: DocumentSummary, snippet: Snippet) -> Self {
        Self {
            document,
            snippet: snippet.highlighted,
            matched: snippet.matched,
        }
    }
}

/// A row of the file listing (no text).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileRow {
    pub id: i64,
    pub filename: String,
    pub dataset: i64,
    pub file_size: i64,
    pub has_text: bool,
    pub needs_ocr: bool,
    pub rel_path: String,
}
