//! Keyword hit summaries from the `search_results` table.
//!
//! The ingestion pipeline pre-computed match counts and a context excerpt for
//! a fixed keyword list; these views only aggregate and list them.

use anyhow::Result;
use serde::Serialize;
use sqlx::{Row, SqlitePool};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordSummary {
    pub keyword: String,
    pub files: i64,
    pub total_matches: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordHit {
    pub file_id: i64,
    pub filename: String,
    pub dataset: i64,
    pub match_count: i64,
    pub context: Option<String>,
}

/// Per-keyword file and match totals, most matches first, keeping only
/// keywords with at least `min_matches` total matches.
pub async fn keyword_summary(pool: &SqlitePool, min_matches: i64) -> Result<Vec<KeywordSummary>> {
    let rows = sqlx::query(
        r#"
        SELECT keyword,
               COUNT(*) AS files,
               COALESCE(SUM(match_count), 0) AS total_matches
        FROM search_results
        GROUP BY keyword
        HAVING COALESCE(SUM(match_count), 0) >= ?
        ORDER BY total_matches DESC, keyword ASC
        "#,
    )
    .bind(min_matches)
    .fetch_all(pool)
    .await?;

    let summaries = rows
        .iter()
        .map(|row| -> Result<KeywordSummary, sqlx::Error> {
            Ok(KeywordSummary {
                keyword: row.try_get("keyword")?,
                files: row.try_get("files")?,
                total_matches: row.try_get("total_matches")?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(summaries)
}

/// Files that matched `keyword`, highest match count first.
pub async fn keyword_hits(pool: &SqlitePool, keyword: &str, limit: i64) -> Result<Vec<KeywordHit>> {
    let rows = sqlx::query(
        r#"
        SELECT f.id AS file_id, f.filename, f.dataset, sr.match_count, sr.context
        FROM search_results sr
        JOIN files f ON f.id = sr.file_id
        WHERE sr.keyword = ?
        ORDER BY sr.match_count DESC, f.id ASC
        LIMIT ?
        "#,
    )
    .bind(keyword)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let hits = rows
        .iter()
        .map(|row| -> Result<KeywordHit, sqlx::Error> {
            Ok(KeywordHit {
                file_id: row.try_get("file_id")?,
                filename: row.try_get("filename")?,
                dataset: row.try_get("dataset")?,
                match_count: row.try_get("match_count")?,
                context: row.try_get("context")?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(hits)
}

/// CLI entry point for `efta keywords`.
pub async fn run_keywords(pool: &SqlitePool, min_matches: i64) -> Result<()> {
    let summaries = keyword_summary(pool, min_matches).await?;
    if summaries.is_empty() {
        println!("No keywords with at least {} matches.", min_matches);
        return Ok(());
    }

    println!("  {:<32} {:>8} {:>14}", "KEYWORD", "FILES", "TOTAL MATCHES");
    println!("  {}", "-".repeat(56));
    for s in &summaries {
        println!("  {:<32} {:>8} {:>14}", s.keyword, s.files, s.total_matches);
    }
    println!();
    Ok(())
}

/// CLI entry point for `efta keyword <kw>`.
pub async fn run_keyword_detail(pool: &SqlitePool, keyword: &str, limit: i64) -> Result<()> {
    let hits = keyword_hits(pool, keyword, limit).await?;
    println!("{}: {} files (showing top {})", keyword, hits.len(), limit);
    println!();
    for h in &hits {
        println!("[DS{}] {} (ID: {})  matches: {}", h.dataset, h.filename, h.file_id, h.match_count);
        if let Some(ref ctx) = h.context {
            println!("    \"{}\"", ctx.replace('\n', " ").trim());
        }
    }
    Ok(())
}
