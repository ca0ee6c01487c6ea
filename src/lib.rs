//! # EFTA Explorer
//!
//! A read-only explorer for a pre-built SQLite database of released
//! documents: per-file metadata, OCR/extracted text, and keyword-match
//! results.
//!
//! The heart of the crate is full-text substring search: scan the extracted
//! text for a case-insensitive substring, cap the number of hits, and cut a
//! highlighted snippet of context around the first match in each document.
//! Around it sit the overview statistics, file browsing, and keyword hit
//! views, exposed through the `efta` CLI and a JSON HTTP API.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌───────────────┐
//! │  SQLite  │──▶│    Corpus    │──▶│    search     │
//! │ (ro pool)│   │ (trait, LIKE)│   │ + snippet     │
//! └────┬─────┘   └──────────────┘   └──────┬────────┘
//!      │  stats / browse / keywords         │
//!      └───────────────┬────────────────────┤
//!                      ▼                    ▼
//!                 ┌──────────┐        ┌──────────┐
//!                 │   CLI    │        │   HTTP   │
//!                 │  (efta)  │        │  (axum)  │
//!                 └──────────┘        └──────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | Read-only database connection |
//! | [`error`] | Typed corpus errors |
//! | [`models`] | Core data types |
//! | [`corpus`] | Storage boundary: SQLite and in-memory |
//! | [`snippet`] | Match-context extraction |
//! | [`search`] | Capped substring search driver |
//! | [`progress`] | Search progress reporting |
//! | [`get`] | Document retrieval |
//! | [`browse`] | File listing with filters |
//! | [`keywords`] | Keyword hit summaries |
//! | [`stats`] | Corpus statistics |
//! | [`server`] | JSON HTTP API |

pub mod browse;
pub mod config;
pub mod corpus;
pub mod db;
pub mod error;
pub mod get;
pub mod keywords;
pub mod models;
pub mod progress;
pub mod search;
pub mod server;
pub mod snippet;
pub mod stats;
