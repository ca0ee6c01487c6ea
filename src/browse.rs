//! File listing with dataset, filename, and text-status filters.

use anyhow::Result;
use serde::Deserialize;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::corpus::sqlite::escape_like;
use crate::models::FileRow;

/// Text extraction status filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TextStatus {
    #[default]
    All,
    HasText,
    NeedsOcr,
    NoText,
}

#[derive(Debug, Clone, Default)]
pub struct BrowseFilter {
    pub dataset: Option<i64>,
    /// Literal, case-insensitive filename substring.
    pub name_contains: Option<String>,
    pub status: TextStatus,
}

/// List files matching `filter`, ordered by dataset then filename.
pub async fn list_files(pool: &SqlitePool, filter: &BrowseFilter, limit: i64) -> Result<Vec<FileRow>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT f.id, f.filename, f.dataset, f.file_size, f.has_text, f.needs_ocr, f.rel_path \
         FROM files f WHERE 1=1",
    );

    if let Some(dataset) = filter.dataset {
        qb.push(" AND f.dataset = ").push_bind(dataset);
    }
    if let Some(name) = filter.name_contains.as_deref().filter(|n| !n.is_empty()) {
        qb.push(" AND f.filename LIKE ")
            .push_bind(format!("%{}%", escape_like(name)))
            .push(" ESCAPE '\\'");
    }
    match filter.status {
        TextStatus::All => {}
        TextStatus::HasText => {
            qb.push(" AND f.has_text = 1");
        }
        TextStatus::NeedsOcr => {
            qb.push(" AND f.needs_ocr = 1");
        }
        TextStatus::NoText => {
            qb.push(" AND f.has_text = 0 AND f.needs_ocr = 0");
        }
    }
    qb.push(" ORDER BY f.dataset, f.filename LIMIT ").push_bind(limit);

    let rows = qb.build().fetch_all(pool).await?;
    let files = rows
        .iter()
        .map(|row| -> Result<FileRow, sqlx::Error> {
            Ok(FileRow {
                id: row.try_get("id")?,
                filename: row.try_get("filename")?,
                dataset: row.try_get("dataset")?,
                file_size: row.try_get::<Option<i64>, _>("file_size")?.unwrap_or(0),
                has_text: row.try_get::<Option<i64>, _>("has_text")?.unwrap_or(0) != 0,
                needs_ocr: row.try_get::<Option<i64>, _>("needs_ocr")?.unwrap_or(0) != 0,
                rel_path: row.try_get("rel_path")?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(files)
}

/// CLI entry point for `efta browse`.
pub async fn run_browse(pool: &SqlitePool, filter: &BrowseFilter, limit: i64) -> Result<()> {
    let files = list_files(pool, filter, limit).await?;

    println!("Showing {} files (limit {})", files.len(), limit);
    if files.is_empty() {
        return Ok(());
    }
    println!();
    println!(
        "  {:>8} {:<24} {:>4} {:>12} {:>5} {:>5}   {}",
        "ID", "FILENAME", "DS", "SIZE", "TEXT", "OCR", "PATH"
    );
    println!("  {}", "-".repeat(90));
    for f in &files {
        println!(
            "  {:>8} {:<24} {:>4} {:>12} {:>5} {:>5}   {}",
            f.id,
            f.filename,
            f.dataset,
            f.file_size,
            if f.has_text { "yes" } else { "no" },
            if f.needs_ocr { "yes" } else { "no" },
            f.rel_path
        );
    }
    println!();
    Ok(())
}
