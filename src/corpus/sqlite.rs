//! SQLite-backed [`Corpus`] implementation.
//!
//! Reads the `files` and `text_cache` tables produced by the ingestion
//! pipeline. Substring matching is delegated to SQLite's `LIKE`, which folds
//! ASCII letters only; the query's own `%`, `_` and `\` are escaped so they
//! match literally.

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::error::CorpusError;
use crate::models::Document;

use super::Corpus;

const DOCUMENT_BY_ID_SQL: &str = r#"
    SELECT f.id, f.filename, f.dataset, f.rel_path,
           tc.extracted_text, tc.char_count, tc.method
    FROM files f
    LEFT JOIN text_cache tc ON tc.file_id = f.id
    WHERE f.id = ?
"#;

const TEXT_CONTAINS_SQL: &str = r#"
    SELECT f.id, f.filename, f.dataset, f.rel_path,
           tc.extracted_text, tc.char_count, tc.method
    FROM text_cache tc
    JOIN files f ON f.id = tc.file_id
    WHERE tc.extracted_text LIKE ? ESCAPE '\'
    LIMIT ?
"#;

/// Corpus over a read-only [`SqlitePool`].
///
/// The pool is opened once by [`db::connect`](crate::db::connect) and handed
/// in; the corpus never opens connections of its own.
#[derive(Debug, Clone)]
pub struct SqliteCorpus {
    pool: SqlitePool,
}

impl SqliteCorpus {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The underlying pool, for the aggregate queries of the stats and browse views.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Escape `LIKE` metacharacters so `needle` is matched literally with `ESCAPE '\'`.
pub fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn row_to_document(row: &SqliteRow) -> Result<Document, sqlx::Error> {
    let char_count: Option<i64> = row.try_get("char_count")?;
    Ok(Document {
        id: row.try_get("id")?,
        filename: row.try_get("filename")?,
        dataset: row.try_get("dataset")?,
        rel_path: row.try_get("rel_path")?,
        extracted_text: row.try_get("extracted_text")?,
        char_count: char_count.unwrap_or(0),
        method: row.try_get("method")?,
    })
}

#[async_trait]
impl Corpus for SqliteCorpus {
    async fn find_by_id(&self, id: i64) -> Result<Option<Document>, CorpusError> {
        let row = sqlx::query(DOCUMENT_BY_ID_SQL)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(Some(row_to_document(&row)?)),
            None => Ok(None),
        }
    }

    fn search_text_contains<'a>(
        &'a self,
        needle: &str,
        limit: usize,
    ) -> BoxStream<'a, Result<Document, CorpusError>> {
        let pattern = format!("%{}%", escape_like(needle));
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        tracing::debug!(pattern = %pattern, limit, "scanning text_cache");

        sqlx::query(TEXT_CONTAINS_SQL)
            .bind(pattern)
            .bind(limit)
            .fetch(&self.pool)
            .map(|row| {
                row.and_then(|r| row_to_document(&r))
                    .map_err(CorpusError::from)
            })
            .boxed()
    }
}
