//! Read-only access to the document corpus.
//!
//! The [`Corpus`] trait is the storage boundary the search core depends on.
//! [`SqliteCorpus`] reads the pre-built database; [`InMemoryCorpus`] holds
//! documents in a `Vec` for tests and embedding.
//!
//! | Method | Purpose |
//! |--------|---------|
//! | [`find_by_id`](Corpus::find_by_id) | Fetch one document with its text |
//! | [`search_text_contains`](Corpus::search_text_contains) | Stream documents whose text contains a substring |

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryCorpus;
pub use sqlite::SqliteCorpus;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::CorpusError;
use crate::models::Document;

/// Abstract read-only document store.
///
/// Implementations never mutate the corpus. Result order from
/// `search_text_contains` is whatever the backend produces.
#[async_trait]
pub trait Corpus: Send + Sync {
    /// Fetch a document by identifier. `Ok(None)` when it does not exist.
    async fn find_by_id(&self, id: i64) -> Result<Option<Document>, CorpusError>;

    /// Lazily yield at most `limit` documents whose extracted text contains
    /// `needle`, ignoring ASCII case. Non-ASCII letters must match exactly,
    /// as with SQLite's `LIKE`. Dropping the stream stops the scan.
    ///
    /// `needle` is assumed non-empty; the search driver rejects empty queries
    /// before reaching the store.
    fn search_text_contains<'a>(
        &'a self,
        needle: &str,
        limit: usize,
    ) -> BoxStream<'a, Result<Document, CorpusError>>;
}
