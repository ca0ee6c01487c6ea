//! TOML configuration.
//!
//! Only `[db].path` is required; every other section falls back to the
//! defaults the dashboard has always used.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::snippet::{Extractor, Markers};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub browse: BrowseConfig,
    #[serde(default)]
    pub keywords: KeywordsConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "default_datasets")]
    pub datasets: Vec<DatasetRange>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_search_limit")]
    pub limit: usize,
    #[serde(default = "default_window")]
    pub window: usize,
    #[serde(default = "default_fallback_chars")]
    pub fallback_chars: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_marker")]
    pub highlight_open: String,
    #[serde(default = "default_marker")]
    pub highlight_close: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: default_search_limit(),
            window: default_window(),
            fallback_chars: default_fallback_chars(),
            batch_size: default_batch_size(),
            highlight_open: default_marker(),
            highlight_close: default_marker(),
        }
    }
}

impl SearchConfig {
    pub fn extractor(&self) -> Extractor {
        Extractor {
            window: self.window,
            fallback_chars: self.fallback_chars,
            markers: Markers {
                open: self.highlight_open.clone(),
                close: self.highlight_close.clone(),
            },
        }
    }
}

fn default_search_limit() -> usize {
    200
}
fn default_window() -> usize {
    crate::snippet::DEFAULT_WINDOW
}
fn default_fallback_chars() -> usize {
    crate::snippet::DEFAULT_FALLBACK_CHARS
}
fn default_batch_size() -> usize {
    10
}
fn default_marker() -> String {
    "**".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct BrowseConfig {
    #[serde(default = "default_browse_limit")]
    pub limit: i64,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            limit: default_browse_limit(),
        }
    }
}

fn default_browse_limit() -> i64 {
    500
}

#[derive(Debug, Deserialize, Clone)]
pub struct KeywordsConfig {
    #[serde(default = "default_min_matches")]
    pub min_matches: i64,
    #[serde(default = "default_detail_limit")]
    pub detail_limit: i64,
}

impl Default for KeywordsConfig {
    fn default() -> Self {
        Self {
            min_matches: default_min_matches(),
            detail_limit: default_detail_limit(),
        }
    }
}

fn default_min_matches() -> i64 {
    10
}
fn default_detail_limit() -> i64 {
    100
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8501".to_string()
}

/// Contiguous block of EFTA identifiers assigned to one dataset.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct DatasetRange {
    pub id: i64,
    pub first_id: i64,
    pub last_id: i64,
}

impl DatasetRange {
    /// Number of identifier slots in the range, inclusive.
    pub fn slots(&self) -> i64 {
        self.last_id - self.first_id + 1
    }
}

fn default_datasets() -> Vec<DatasetRange> {
    vec![
        DatasetRange {
            id: 8,
            first_id: 1,
            last_id: 423_792,
        },
        DatasetRange {
            id: 9,
            first_id: 423_793,
            last_id: 1_262_781,
        },
        DatasetRange {
            id: 10,
            first_id: 1_262_782,
            last_id: 2_212_882,
        },
        DatasetRange {
            id: 11,
            first_id: 2_212_883,
            last_id: 2_730_264,
        },
    ]
}

impl Config {
    /// Config pointing at `path` with every other setting defaulted.
    pub fn with_db_path(path: impl Into<PathBuf>) -> Self {
        Self {
            db: DbConfig { path: path.into() },
            search: SearchConfig::default(),
            browse: BrowseConfig::default(),
            keywords: KeywordsConfig::default(),
            server: ServerConfig::default(),
            datasets: default_datasets(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.search.limit < 1 {
        anyhow::bail!("search.limit must be >= 1");
    }
    if config.search.batch_size < 1 {
        anyhow::bail!("search.batch_size must be >= 1");
    }
    if config.browse.limit < 1 {
        anyhow::bail!("browse.limit must be >= 1");
    }
    if config.keywords.detail_limit < 1 {
        anyhow::bail!("keywords.detail_limit must be >= 1");
    }
    for ds in &config.datasets {
        if ds.last_id < ds.first_id {
            anyhow::bail!(
                "datasets: range for dataset {} ends ({}) before it starts ({})",
                ds.id,
                ds.last_id,
                ds.first_id
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_str: &str) -> Result<Config> {
        let config: Config = toml::from_str(toml_str)?;
        validate(&config)?;
        Ok(config)
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let cfg = parse("[db]\npath = \"./data/epstein.db\"\n").unwrap();
        assert_eq!(cfg.search.limit, 200);
        assert_eq!(cfg.search.window, 200);
        assert_eq!(cfg.search.fallback_chars, 400);
        assert_eq!(cfg.search.batch_size, 10);
        assert_eq!(cfg.browse.limit, 500);
        assert_eq!(cfg.keywords.min_matches, 10);
        assert_eq!(cfg.keywords.detail_limit, 100);
        assert_eq!(cfg.datasets.len(), 4);
        assert_eq!(cfg.datasets[1].slots(), 838_989);
    }

    #[test]
    fn test_overrides() {
        let cfg = parse(
            r#"
            [db]
            path = "x.db"

            [search]
            limit = 50
            window = 80
            highlight_open = "<b>"
            highlight_close = "</b>"

            [[datasets]]
            id = 1
            first_id = 10
            last_id = 19
            "#,
        )
        .unwrap();
        assert_eq!(cfg.search.limit, 50);
        let extractor = cfg.search.extractor();
        assert_eq!(extractor.window, 80);
        assert_eq!(extractor.markers.open, "<b>");
        assert_eq!(cfg.datasets, vec![DatasetRange { id: 1, first_id: 10, last_id: 19 }]);
        assert_eq!(cfg.datasets[0].slots(), 10);
    }

    #[test]
    fn test_rejects_zero_limit() {
        let err = parse("[db]\npath = \"x.db\"\n[search]\nlimit = 0\n").unwrap_err();
        assert!(err.to_string().contains("search.limit"));
    }

    #[test]
    fn test_rejects_inverted_dataset_range() {
        let err = parse(
            "[db]\npath = \"x.db\"\n[[datasets]]\nid = 3\nfirst_id = 100\nlast_id = 5\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("dataset 3"));
    }

    #[test]
    fn test_missing_db_section_fails() {
        assert!(parse("[search]\nlimit = 5\n").is_err());
    }
}
