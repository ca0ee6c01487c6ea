//! Typed errors for corpus access and search.
//!
//! Command and configuration glue uses `anyhow`; everything that crosses the
//! [`Corpus`](crate::corpus::Corpus) boundary reports a [`CorpusError`] so
//! callers can tell a bad query apart from an unreachable store.

/// Failures surfaced by the corpus reader and the search driver.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    /// The query string was empty or too long to match. Not retryable.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The underlying store could not be reached or a query against it failed.
    /// Callers may retry.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// No document exists with the requested identifier.
    #[error("document not found: {0}")]
    NotFound(i64),
}

impl From<sqlx::Error> for CorpusError {
    fn from(err: sqlx::Error) -> Self {
        CorpusError::StorageUnavailable(err.to_string())
    }
}

impl CorpusError {
    /// Whether retrying the same call might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CorpusError::StorageUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_storage_errors_are_retryable() {
        assert!(!CorpusError::InvalidQuery("query must not be empty".into()).is_retryable());
        assert!(!CorpusError::NotFound(7).is_retryable());
        assert!(CorpusError::StorageUnavailable("closed".into()).is_retryable());
    }

    #[test]
    fn sqlx_errors_map_to_storage_unavailable() {
        let err: CorpusError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, CorpusError::StorageUnavailable(_)));
    }
}
