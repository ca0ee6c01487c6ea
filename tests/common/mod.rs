//! Shared fixture: builds a small corpus database in the layout the ingestion
//! pipeline produces.

#![allow(dead_code)]

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::TempDir;

use efta_explorer::config::Config;

#[derive(Debug, Clone)]
pub struct FixtureFile {
    pub id: i64,
    pub dataset: i64,
    pub file_size: i64,
    pub needs_ocr: bool,
    pub text: Option<String>,
    pub method: Option<String>,
}

impl FixtureFile {
    pub fn with_text(id: i64, dataset: i64, text: &str) -> Self {
        Self {
            id,
            dataset,
            file_size: 20_000 + id % 1000,
            needs_ocr: false,
            text: Some(text.to_string()),
            method: Some("pdftotext".to_string()),
        }
    }

    pub fn needing_ocr(id: i64, dataset: i64) -> Self {
        Self {
            id,
            dataset,
            file_size: 2_000_000,
            needs_ocr: true,
            text: None,
            method: None,
        }
    }

    pub fn filename(&self) -> String {
        format!("EFTA{:08}.pdf", self.id)
    }

    pub fn rel_path(&self) -> String {
        format!("DataSet {}/{}", self.dataset, self.filename())
    }
}

#[derive(Debug, Clone)]
pub struct FixtureKeywordHit {
    pub file_id: i64,
    pub keyword: String,
    pub match_count: i64,
    pub context: String,
}

pub fn keyword_hit(file_id: i64, keyword: &str, match_count: i64) -> FixtureKeywordHit {
    FixtureKeywordHit {
        file_id,
        keyword: keyword.to_string(),
        match_count,
        context: format!("... {} ...", keyword),
    }
}

/// Write the fixture database to `path`.
pub async fn create_corpus_db(
    path: &Path,
    files: &[FixtureFile],
    hits: &[FixtureKeywordHit],
    with_production: bool,
) {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
        .unwrap()
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();

    for ddl in [
        r#"CREATE TABLE files (
            id INTEGER PRIMARY KEY,
            filename TEXT NOT NULL,
            dataset INTEGER NOT NULL,
            file_size INTEGER,
            has_text INTEGER NOT NULL DEFAULT 0,
            needs_ocr INTEGER NOT NULL DEFAULT 0,
            rel_path TEXT NOT NULL
        )"#,
        r#"CREATE TABLE text_cache (
            file_id INTEGER PRIMARY KEY,
            extracted_text TEXT,
            char_count INTEGER,
            method TEXT
        )"#,
        r#"CREATE TABLE search_results (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            file_id INTEGER NOT NULL,
            keyword TEXT NOT NULL,
            match_count INTEGER NOT NULL,
            context TEXT
        )"#,
    ] {
        sqlx::query(ddl).execute(&pool).await.unwrap();
    }

    if with_production {
        sqlx::query(
            "CREATE TABLE production_files (id INTEGER PRIMARY KEY, filename TEXT, file_type TEXT, file_size INTEGER)",
        )
        .execute(&pool)
        .await
        .unwrap();
        for (i, (ty, size)) in [("DAT", 1_048_576), ("OPT", 2_097_152), ("DAT", 1_048_576)]
            .iter()
            .enumerate()
        {
            sqlx::query("INSERT INTO production_files (id, filename, file_type, file_size) VALUES (?, ?, ?, ?)")
                .bind(i as i64 + 1)
                .bind(format!("VOL{:05}.{}", i, ty))
                .bind(*ty)
                .bind(*size as i64)
                .execute(&pool)
                .await
                .unwrap();
        }
    }

    let mut tx = pool.begin().await.unwrap();
    for f in files {
        let has_text = f.text.as_deref().is_some_and(|t| !t.is_empty());
        sqlx::query(
            "INSERT INTO files (id, filename, dataset, file_size, has_text, needs_ocr, rel_path) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(f.id)
        .bind(f.filename())
        .bind(f.dataset)
        .bind(f.file_size)
        .bind(has_text as i64)
        .bind(f.needs_ocr as i64)
        .bind(f.rel_path())
        .execute(&mut *tx)
        .await
        .unwrap();

        if let Some(ref text) = f.text {
            sqlx::query(
                "INSERT INTO text_cache (file_id, extracted_text, char_count, method) VALUES (?, ?, ?, ?)",
            )
            .bind(f.id)
            .bind(text)
            .bind(text.chars().count() as i64)
            .bind(&f.method)
            .execute(&mut *tx)
            .await
            .unwrap();
        }
    }
    for h in hits {
        sqlx::query(
            "INSERT INTO search_results (file_id, keyword, match_count, context) VALUES (?, ?, ?, ?)",
        )
        .bind(h.file_id)
        .bind(&h.keyword)
        .bind(h.match_count)
        .bind(&h.context)
        .execute(&mut *tx)
        .await
        .unwrap();
    }
    tx.commit().await.unwrap();
    pool.close().await;
}

/// A handful of files across two datasets, with keyword hits.
pub fn sample_files() -> Vec<FixtureFile> {
    vec![
        FixtureFile::with_text(
            423_800,
            9,
            "Flight manifest lists Jeffrey Epstein and two passengers departing Palm Beach.",
        ),
        FixtureFile::with_text(
            423_801,
            9,
            "Deposition transcript. Q: Did you visit the island? A: I do not recall.",
        ),
        FixtureFile::with_text(
            1_262_900,
            10,
            "Invoice for 100% of services rendered; file_a attached. EPSTEIN account.",
        ),
        FixtureFile::with_text(1_262_901, 10, "Blank cover sheet"),
        FixtureFile::needing_ocr(1_262_902, 10),
    ]
}

pub fn sample_hits() -> Vec<FixtureKeywordHit> {
    vec![
        keyword_hit(423_800, "epstein", 12),
        keyword_hit(1_262_900, "epstein", 3),
        keyword_hit(423_800, "palm beach", 4),
        keyword_hit(423_801, "island", 2),
    ]
}

/// Temp dir holding `corpus.db` built from the sample data plus a config file.
pub async fn setup_sample_env() -> (TempDir, PathBuf, Config) {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("corpus.db");
    create_corpus_db(&db_path, &sample_files(), &sample_hits(), true).await;

    let config_dir = tmp.path().join("config");
    std::fs::create_dir_all(&config_dir).unwrap();
    let config_path = config_dir.join("explorer.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"[db]
path = "{}"

[search]
limit = 200
window = 30
batch_size = 2

[keywords]
min_matches = 3

[server]
bind = "127.0.0.1:0"

[[datasets]]
id = 9
first_id = 423793
last_id = 1262781

[[datasets]]
id = 10
first_id = 1262782
last_id = 2212882
"#,
            db_path.display()
        ),
    )
    .unwrap();

    let config = efta_explorer::config::load_config(&config_path).unwrap();
    (tmp, config_path, config)
}
