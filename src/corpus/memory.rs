//! In-memory [`Corpus`] implementation for tests and embedding.
//!
//! Matching folds ASCII letters only, mirroring SQLite's `LIKE`, so both
//! backends return the same documents for the same query.

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};

use crate::error::CorpusError;
use crate::models::Document;

use super::Corpus;

/// Corpus backed by a plain `Vec`. Iteration order is insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCorpus {
    docs: Vec<Document>,
}

impl InMemoryCorpus {
    pub fn new(docs: Vec<Document>) -> Self {
        Self { docs }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

#[async_trait]
impl Corpus for InMemoryCorpus {
    async fn find_by_id(&self, id: i64) -> Result<Option<Document>, CorpusError> {
        Ok(self.docs.iter().find(|d| d.id == id).cloned())
    }

    fn search_text_contains<'a>(
        &'a self,
        needle: &str,
        limit: usize,
    ) -> BoxStream<'a, Result<Document, CorpusError>> {
        let needle = needle.to_ascii_lowercase();
        let hits = self
            .docs
            .iter()
            .filter(move |d| {
                d.extracted_text
                    .as_deref()
                    .is_some_and(|t| t.to_ascii_lowercase().contains(&needle))
            })
            .take(limit)
            .cloned()
            .map(Ok);
        stream::iter(hits).boxed()
    }
}
