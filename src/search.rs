//! Full-text substring search.
//!
//! [`search`] validates the query and turns the corpus's lazy document stream
//! into a lazy stream of [`MatchResult`]s, extracting a snippet per hit.
//! [`collect_matches`] drives that stream to completion while reporting
//! progress every `batch_size` hits. Results are capped, never ranked; order
//! is whatever the store produces.

use futures::stream::{BoxStream, StreamExt, TryStreamExt};

use crate::config::{Config, SearchConfig};
use crate::corpus::{Corpus, SqliteCorpus};
use crate::error::CorpusError;
use crate::models::MatchResult;
use crate::progress::{NoProgress, ProgressMode, SearchProgressEvent, SearchProgressReporter};
use crate::snippet::Extractor;

/// Longest accepted query, in bytes. SQLite rejects `LIKE` patterns over
/// 50,000 bytes and escaping can double a query's length.
pub const MAX_QUERY_BYTES: usize = 16 * 1024;

/// Knobs for one search invocation.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Maximum number of documents returned.
    pub limit: usize,
    pub extractor: Extractor,
    /// Hits between progress reports.
    pub batch_size: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for SearchOptions {
    fn from(cfg: &SearchConfig) -> Self {
        Self {
            limit: cfg.limit,
            extractor: cfg.extractor(),
            batch_size: cfg.batch_size,
        }
    }
}

/// Lazily search `corpus` for documents containing `query`.
///
/// Fails up front with [`CorpusError::InvalidQuery`] for an empty query or
/// one longer than [`MAX_QUERY_BYTES`].
/// Storage failures surface as `Err` items in the stream. Dropping the stream
/// cancels the scan.
pub fn search<'a, C>(
    corpus: &'a C,
    query: &str,
    options: &SearchOptions,
) -> Result<BoxStream<'a, Result<MatchResult, CorpusError>>, CorpusError>
where
    C: Corpus + ?Sized,
{
    if query.is_empty() {
        return Err(CorpusError::InvalidQuery(
            "query must not be empty".to_string(),
        ));
    }
    if query.len() > MAX_QUERY_BYTES {
        return Err(CorpusError::InvalidQuery(format!(
            "query is {} bytes, the maximum is {}",
            query.len(),
            MAX_QUERY_BYTES
        )));
    }

    let query_owned = query.to_string();
    let extractor = options.extractor.clone();
    let hits = corpus
        .search_text_contains(query, options.limit)
        .map_ok(move |doc| {
            let snippet = extractor.extract(doc.text(), &query_owned);
            MatchResult::new(doc.summary(), snippet)
        });
    Ok(hits.boxed())
}

/// Run a search to completion, reporting progress after every batch.
pub async fn collect_matches<C>(
    corpus: &C,
    query: &str,
    options: &SearchOptions,
    progress: &dyn SearchProgressReporter,
) -> Result<Vec<MatchResult>, CorpusError>
where
    C: Corpus + ?Sized,
{
    let mut hits = search(corpus, query, options)?;
    let batch_size = options.batch_size.max(1);

    progress.report(SearchProgressEvent::Scanning {
        query: query.to_string(),
    });

    let mut results = Vec::new();
    while let Some(hit) = hits.try_next().await? {
        results.push(hit);
        if results.len() % batch_size == 0 {
            progress.report(SearchProgressEvent::Found {
                found: results.len() as u64,
            });
        }
    }
    if results.len() % batch_size != 0 {
        progress.report(SearchProgressEvent::Found {
            found: results.len() as u64,
        });
    }

    progress.report(SearchProgressEvent::Done {
        found: results.len() as u64,
    });
    tracing::info!(query, found = results.len(), limit = options.limit, "search finished");
    Ok(results)
}

/// Run a search without progress reporting.
pub async fn search_all<C>(
    corpus: &C,
    query: &str,
    options: &SearchOptions,
) -> Result<Vec<MatchResult>, CorpusError>
where
    C: Corpus + ?Sized,
{
    collect_matches(corpus, query, options, &NoProgress).await
}

/// CLI entry point for `efta search`.
pub async fn run_search(
    corpus: &SqliteCorpus,
    config: &Config,
    query: &str,
    limit: Option<usize>,
    window: Option<usize>,
    progress: ProgressMode,
) -> anyhow::Result<()> {
    let mut options = SearchOptions::from(&config.search);
    if let Some(limit) = limit {
        options.limit = limit;
    }
    if let Some(window) = window {
        options.extractor.window = window;
    }

    let reporter = progress.reporter();
    let results = collect_matches(corpus, query, &options, reporter.as_ref()).await?;

    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    println!("{} files found (limit {})", results.len(), options.limit);
    println!();
    for hit in &results {
        let doc = &hit.document;
        println!("[DS{}] {} (ID: {})", doc.dataset, doc.filename, doc.id);
        println!("    path: {}", doc.rel_path);
        println!("    ...{}...", hit.snippet.replace('\n', " ").trim());
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::InMemoryCorpus;
    use crate::models::Document;
    use std::sync::Mutex;

    fn doc(id: i64, text: &str) -> Document {
        Document {
            id,
            filename: format!("EFTA{:08}.pdf", id),
            dataset: 10,
            rel_path: format!("ds10/EFTA{:08}.pdf", id),
            extracted_text: Some(text.to_string()),
            char_count: text.chars().count() as i64,
            method: Some("pdftotext".to_string()),
        }
    }

    #[tokio::test]
    async fn test_empty_query_is_invalid() {
        let corpus = InMemoryCorpus::new(vec![doc(1, "anything")]);
        for limit in [0, 1, 200] {
            let options = SearchOptions {
                limit,
                ..SearchOptions::default()
            };
            let err = search_all(&corpus, "", &options).await.unwrap_err();
            assert!(matches!(err, CorpusError::InvalidQuery(_)));
        }
    }

    #[tokio::test]
    async fn test_query_length_is_capped() {
        let corpus = InMemoryCorpus::new(vec![doc(1, &"a".repeat(MAX_QUERY_BYTES + 1))]);
        let at_cap = "a".repeat(MAX_QUERY_BYTES);
        let results = search_all(&corpus, &at_cap, &SearchOptions::default())
            .await
            .unwrap();
        assert_eq!(results.len(), 1);

        let over = "a".repeat(MAX_QUERY_BYTES + 1);
        let err = search_all(&corpus, &over, &SearchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CorpusError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn test_hits_carry_highlighted_snippets() {
        let corpus = InMemoryCorpus::new(vec![
            doc(1, "Nothing relevant here"),
            doc(2, "The quick brown Fox jumps"),
        ]);
        let results = search_all(&corpus, "fox", &SearchOptions::default())
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document.id, 2);
        assert!(results[0].matched);
        assert!(results[0].snippet.contains("**Fox**"));
    }

    #[tokio::test]
    async fn test_progress_reports_every_batch() {
        let docs = (1..=25).map(|i| doc(i, "flight log entry")).collect();
        let corpus = InMemoryCorpus::new(docs);
        let events = Mutex::new(Vec::new());
        let reporter = |e: SearchProgressEvent| events.lock().unwrap().push(e);

        let options = SearchOptions {
            batch_size: 10,
            ..SearchOptions::default()
        };
        let results = collect_matches(&corpus, "LOG", &options, &reporter)
            .await
            .unwrap();
        assert_eq!(results.len(), 25);

        let events = events.into_inner().unwrap();
        assert_eq!(
            events,
            vec![
                SearchProgressEvent::Scanning {
                    query: "LOG".to_string()
                },
                SearchProgressEvent::Found { found: 10 },
                SearchProgressEvent::Found { found: 20 },
                SearchProgressEvent::Found { found: 25 },
                SearchProgressEvent::Done { found: 25 },
            ]
        );
    }

    #[tokio::test]
    async fn test_stream_can_be_abandoned_early() {
        let docs = (1..=50).map(|i| doc(i, "match")).collect();
        let corpus = InMemoryCorpus::new(docs);
        let options = SearchOptions::default();
        let first_three: Vec<_> = search(&corpus, "match", &options)
            .unwrap()
            .take(3)
            .try_collect()
            .await
            .unwrap();
        assert_eq!(first_three.len(), 3);
    }
}
