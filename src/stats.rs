//! Corpus overview and distribution statistics.
//!
//! Summarizes what the ingestion pipeline produced: file and text counts,
//! per-dataset breakdowns, production-file types, fill rate against each
//! dataset's EFTA identifier range, and size/length histograms. Used by
//! `efta stats` and `GET /stats`.

use anyhow::Result;
use serde::Serialize;
use sqlx::{Row, SqlitePool};

use crate::config::{Config, DatasetRange};
use crate::progress::format_number;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Overview {
    pub total_files: i64,
    pub text_extracted: i64,
    pub total_chars: i64,
    pub distinct_keywords: i64,
    pub keyword_matches: i64,
    pub needs_ocr: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetStats {
    pub dataset: i64,
    pub files: i64,
    pub size_mb: f64,
    pub has_text: i64,
    pub needs_ocr: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionStats {
    pub file_type: String,
    pub count: i64,
    pub size_mb: f64,
}

/// Files found versus identifier slots for one dataset range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FillRate {
    pub dataset: i64,
    pub first_id: i64,
    pub last_id: i64,
    pub slots: i64,
    pub files_found: i64,
    /// Percentage in `[0, 100]`.
    pub fill_rate: f64,
}

impl FillRate {
    pub fn new(range: &DatasetRange, files_found: i64) -> Self {
        let slots = range.slots();
        let fill_rate = if slots > 0 {
            files_found as f64 * 100.0 / slots as f64
        } else {
            0.0
        };
        Self {
            dataset: range.id,
            first_id: range.first_id,
            last_id: range.last_id,
            slots,
            files_found,
            fill_rate,
        }
    }
}

/// One histogram bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusStats {
    pub overview: Overview,
    pub datasets: Vec<DatasetStats>,
    /// Empty when the database has no `production_files` table.
    pub production: Vec<ProductionStats>,
    pub fill_rates: Vec<FillRate>,
    pub file_sizes: Vec<Bucket>,
    pub text_lengths: Vec<Bucket>,
}

pub async fn overview(pool: &SqlitePool) -> Result<Overview> {
    let total_files: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files")
        .fetch_one(pool)
        .await?;
    let text_extracted: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM text_cache")
        .fetch_one(pool)
        .await?;
    let total_chars: Option<i64> = sqlx::query_scalar("SELECT SUM(char_count) FROM text_cache")
        .fetch_one(pool)
        .await?;
    let distinct_keywords: i64 =
        sqlx::query_scalar("SELECT COUNT(DISTINCT keyword) FROM search_results")
            .fetch_one(pool)
            .await?;
    let keyword_matches: Option<i64> =
        sqlx::query_scalar("SELECT SUM(match_count) FROM search_results")
            .fetch_one(pool)
            .await?;
    let needs_ocr: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files WHERE needs_ocr = 1")
        .fetch_one(pool)
        .await?;

    Ok(Overview {
        total_files,
        text_extracted,
        total_chars: total_chars.unwrap_or(0),
        distinct_keywords,
        keyword_matches: keyword_matches.unwrap_or(0),
        needs_ocr,
    })
}

pub async fn dataset_stats(pool: &SqlitePool) -> Result<Vec<DatasetStats>> {
    let rows = sqlx::query(
        r#"
        SELECT dataset,
               COUNT(*) AS files,
               ROUND(COALESCE(SUM(file_size), 0) / 1024.0 / 1024.0, 1) AS size_mb,
               COALESCE(SUM(has_text), 0) AS has_text,
               COALESCE(SUM(needs_ocr), 0) AS needs_ocr
        FROM files
        GROUP BY dataset
        ORDER BY dataset
        "#,
    )
    .fetch_all(pool)
    .await?;

    let stats = rows
        .iter()
        .map(|row| -> Result<DatasetStats, sqlx::Error> {
            Ok(DatasetStats {
                dataset: row.try_get("dataset")?,
                files: row.try_get("files")?,
                size_mb: row.try_get("size_mb")?,
                has_text: row.try_get("has_text")?,
                needs_ocr: row.try_get("needs_ocr")?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(stats)
}

/// Production files grouped by type. The table is optional in older databases.
pub async fn production_stats(pool: &SqlitePool) -> Result<Vec<ProductionStats>> {
    let table_exists: bool = sqlx::query_scalar(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='production_files'",
    )
    .fetch_one(pool)
    .await?;
    if !table_exists {
        return Ok(Vec::new());
    }

    let rows = sqlx::query(
        r#"
        SELECT file_type,
               COUNT(*) AS count,
               ROUND(COALESCE(SUM(file_size), 0) / 1024.0 / 1024.0, 1) AS size_mb
        FROM production_files
        GROUP BY file_type
        ORDER BY COUNT(*) DESC, file_type ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let stats = rows
        .iter()
        .map(|row| -> Result<ProductionStats, sqlx::Error> {
            Ok(ProductionStats {
                file_type: row.try_get("file_type")?,
                count: row.try_get("count")?,
                size_mb: row.try_get("size_mb")?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(stats)
}

/// Fill rate for each configured range, using the per-dataset file counts.
pub fn fill_rates(ranges: &[DatasetRange], datasets: &[DatasetStats]) -> Vec<FillRate> {
    ranges
        .iter()
        .map(|range| {
            let found = datasets
                .iter()
                .find(|d| d.dataset == range.id)
                .map(|d| d.files)
                .unwrap_or(0);
            FillRate::new(range, found)
        })
        .collect()
}

pub async fn file_size_buckets(pool: &SqlitePool) -> Result<Vec<Bucket>> {
    buckets(
        pool,
        r#"
        SELECT
            CASE
                WHEN file_size < 10240 THEN '< 10KB'
                WHEN file_size < 102400 THEN '10KB - 100KB'
                WHEN file_size < 1048576 THEN '100KB - 1MB'
                WHEN file_size < 10485760 THEN '1MB - 10MB'
                ELSE '> 10MB'
            END AS label,
            COUNT(*) AS count
        FROM files
        GROUP BY 1
        ORDER BY MIN(file_size)
        "#,
    )
    .await
}

pub async fn text_length_buckets(pool: &SqlitePool) -> Result<Vec<Bucket>> {
    buckets(
        pool,
        r#"
        SELECT
            CASE
                WHEN char_count < 100 THEN '< 100 chars'
                WHEN char_count < 1000 THEN '100 - 1K chars'
                WHEN char_count < 10000 THEN '1K - 10K chars'
                WHEN char_count < 100000 THEN '10K - 100K chars'
                ELSE '> 100K chars'
            END AS label,
            COUNT(*) AS count
        FROM text_cache
        GROUP BY 1
        ORDER BY MIN(char_count)
        "#,
    )
    .await
}

async fn buckets(pool: &SqlitePool, sql: &str) -> Result<Vec<Bucket>> {
    let rows = sqlx::query(sql).fetch_all(pool).await?;
    let buckets = rows
        .iter()
        .map(|row| -> Result<Bucket, sqlx::Error> {
            Ok(Bucket {
                label: row.try_get("label")?,
                count: row.try_get("count")?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(buckets)
}

/// Gather every statistic in one pass over the pool.
pub async fn collect_stats(pool: &SqlitePool, ranges: &[DatasetRange]) -> Result<CorpusStats> {
    let overview = overview(pool).await?;
    let datasets = dataset_stats(pool).await?;
    let production = production_stats(pool).await?;
    let fill_rates = fill_rates(ranges, &datasets);
    let file_sizes = file_size_buckets(pool).await?;
    let text_lengths = text_length_buckets(pool).await?;

    Ok(CorpusStats {
        overview,
        datasets,
        production,
        fill_rates,
        file_sizes,
        text_lengths,
    })
}

/// CLI entry point for `efta stats`.
pub async fn run_stats(pool: &SqlitePool, config: &Config) -> Result<()> {
    let stats = collect_stats(pool, &config.datasets).await?;
    let o = &stats.overview;

    let db_size = std::fs::metadata(&config.db.path)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("EFTA Explorer - Corpus Stats");
    println!("============================");
    println!();
    println!("  Database:          {}", config.db.path.display());
    println!("  Size:              {}", format_bytes(db_size));
    println!();
    println!("  Files:             {}", format_number(o.total_files.max(0) as u64));
    println!("  Text extracted:    {}", format_number(o.text_extracted.max(0) as u64));
    println!(
        "  Characters:        {:.1}M",
        o.total_chars as f64 / 1_000_000.0
    );
    println!("  Needs OCR:         {}", format_number(o.needs_ocr.max(0) as u64));
    println!("  Keywords:          {}", o.distinct_keywords);
    println!("  Keyword matches:   {}", format_number(o.keyword_matches.max(0) as u64));

    if !stats.datasets.is_empty() {
        println!();
        println!("  By dataset:");
        println!(
            "  {:>7} {:>8} {:>10} {:>9} {:>9}",
            "DATASET", "FILES", "SIZE (MB)", "HAS TEXT", "NEEDS OCR"
        );
        println!("  {}", "-".repeat(47));
        for d in &stats.datasets {
            println!(
                "  {:>7} {:>8} {:>10.1} {:>9} {:>9}",
                d.dataset, d.files, d.size_mb, d.has_text, d.needs_ocr
            );
        }
    }

    if !stats.production.is_empty() {
        println!();
        println!("  Production files:");
        println!("  {:<12} {:>8} {:>10}", "TYPE", "COUNT", "SIZE (MB)");
        println!("  {}", "-".repeat(32));
        for p in &stats.production {
            println!("  {:<12} {:>8} {:>10.1}", p.file_type, p.count, p.size_mb);
        }
    }

    if !stats.fill_rates.is_empty() {
        println!();
        println!("  Fill rate:");
        println!(
            "  {:>7} {:<19} {:>11} {:>8} {:>9}",
            "DATASET", "EFTA RANGE", "SLOTS", "FOUND", "FILL"
        );
        println!("  {}", "-".repeat(58));
        for f in &stats.fill_rates {
            println!(
                "  {:>7} {:08}-{:08}  {:>11} {:>8} {:>8.3}%",
                f.dataset,
                f.first_id,
                f.last_id,
                format_number(f.slots.max(0) as u64),
                f.files_found,
                f.fill_rate
            );
        }
    }

    print_buckets("File size distribution", &stats.file_sizes);
    print_buckets("Text length distribution", &stats.text_lengths);
    println!();
    Ok(())
}

fn print_buckets(title: &str, buckets: &[Bucket]) {
    if buckets.is_empty() {
        return;
    }
    println!();
    println!("  {}:", title);
    for b in buckets {
        println!("  {:<18} {:>8}", b.label, b.count);
    }
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_fill_rate_matches_dataset_counts() {
        let ranges = vec![
            DatasetRange {
                id: 9,
                first_id: 423_793,
                last_id: 1_262_781,
            },
            DatasetRange {
                id: 11,
                first_id: 1,
                last_id: 100,
            },
        ];
        let datasets = vec![DatasetStats {
            dataset: 9,
            files: 807,
            size_mb: 1.0,
            has_text: 800,
            needs_ocr: 7,
        }];
        let rates = fill_rates(&ranges, &datasets);
        assert_eq!(rates[0].slots, 838_989);
        assert_eq!(rates[0].files_found, 807);
        assert!((rates[0].fill_rate - 0.0962).abs() < 1e-3);
        assert_eq!(rates[1].files_found, 0);
        assert_eq!(rates[1].fill_rate, 0.0);
    }
}
