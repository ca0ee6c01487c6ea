//! Read-only JSON HTTP API over the corpus.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Health check (returns version) |
//! | `GET` | `/search?q=&limit=&window=` | Full-text substring search with snippets |
//! | `GET` | `/files?dataset=&name=&status=` | File listing |
//! | `GET` | `/files/{id}` | One document with its extracted text |
//! | `GET` | `/stats` | Overview, per-dataset breakdown, fill rates, histograms |
//! | `GET` | `/keywords?min_matches=` | Keyword hit summary |
//! | `GET` | `/keywords/{keyword}?limit=` | Files matching one keyword |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "invalid query: query must not be empty" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404),
//! `storage_unavailable` (503), `internal` (500).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::browse::{self, BrowseFilter, TextStatus};
use crate::config::Config;
use crate::corpus::SqliteCorpus;
use crate::error::CorpusError;
use crate::get::get_document;
use crate::keywords::{self, KeywordHit, KeywordSummary};
use crate::models::{Document, FileRow, MatchResult};
use crate::search::{search_all, SearchOptions};
use crate::stats::{self, CorpusStats};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub corpus: Arc<SqliteCorpus>,
}

impl AppState {
    pub fn new(config: Config, corpus: SqliteCorpus) -> Self {
        Self {
            config: Arc::new(config),
            corpus: Arc::new(corpus),
        }
    }
}

/// Build the router. Exposed separately so tests can serve it on their own listener.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/search", get(handle_search))
        .route("/files", get(handle_list_files))
        .route("/files/{id}", get(handle_get_file))
        .route("/stats", get(handle_stats))
        .route("/keywords", get(handle_keywords))
        .route("/keywords/{keyword}", get(handle_keyword_detail))
        .layer(cors)
        .with_state(state)
}

/// Serve the API on `[server].bind` until the process is terminated.
pub async fn run_server(config: Config, corpus: SqliteCorpus) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(AppState::new(config, corpus));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on http://{}", bind_addr);
    println!("EFTA Explorer API listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<CorpusError> for AppError {
    fn from(err: CorpusError) -> Self {
        let (status, code) = match &err {
            CorpusError::InvalidQuery(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            CorpusError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            CorpusError::StorageUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "storage_unavailable")
            }
        };
        AppError {
            status,
            code,
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<CorpusError>() {
            Ok(corpus_err) => corpus_err.into(),
            Err(err) if err.downcast_ref::<sqlx::Error>().is_some() => AppError {
                status: StatusCode::SERVICE_UNAVAILABLE,
                code: "storage_unavailable",
                message: format!("storage unavailable: {}", err),
            },
            Err(err) => {
                tracing::error!(error = %err, "request failed");
                AppError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    code: "internal",
                    message: err.to_string(),
                }
            }
        }
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /search ============

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
    limit: Option<usize>,
    window: Option<usize>,
}

#[derive(Serialize)]
struct SearchResponse {
    query: String,
    count: usize,
    limit: usize,
    results: Vec<MatchResult>,
}

async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let mut options = SearchOptions::from(&state.config.search);
    if let Some(limit) = params.limit {
        options.limit = limit;
    }
    if let Some(window) = params.window {
        options.extractor.window = window;
    }

    let results = search_all(state.corpus.as_ref(), &params.q, &options).await?;
    Ok(Json(SearchResponse {
        query: params.q,
        count: results.len(),
        limit: options.limit,
        results,
    }))
}

// ============ GET /files ============

#[derive(Deserialize)]
struct BrowseParams {
    dataset: Option<i64>,
    name: Option<String>,
    #[serde(default)]
    status: TextStatus,
    limit: Option<i64>,
}

#[derive(Serialize)]
struct FilesResponse {
    files: Vec<FileRow>,
}

async fn handle_list_files(
    State(state): State<AppState>,
    Query(params): Query<BrowseParams>,
) -> Result<Json<FilesResponse>, AppError> {
    let limit = params.limit.unwrap_or(state.config.browse.limit);
    if limit < 1 {
        return Err(bad_request("limit must be >= 1"));
    }
    let filter = BrowseFilter {
        dataset: params.dataset,
        name_contains: params.name,
        status: params.status,
    };
    let files = browse::list_files(state.corpus.pool(), &filter, limit).await?;
    Ok(Json(FilesResponse { files }))
}

// ============ GET /files/{id} ============

async fn handle_get_file(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Document>, AppError> {
    let doc = get_document(state.corpus.as_ref(), id).await?;
    Ok(Json(doc))
}

// ============ GET /stats ============

async fn handle_stats(State(state): State<AppState>) -> Result<Json<CorpusStats>, AppError> {
    let stats = stats::collect_stats(state.corpus.pool(), &state.config.datasets).await?;
    Ok(Json(stats))
}

// ============ GET /keywords ============

#[derive(Deserialize)]
struct KeywordParams {
    min_matches: Option<i64>,
    limit: Option<i64>,
}

#[derive(Serialize)]
struct KeywordsResponse {
    keywords: Vec<KeywordSummary>,
}

#[derive(Serialize)]
struct KeywordDetailResponse {
    keyword: String,
    files: Vec<KeywordHit>,
}

async fn handle_keywords(
    State(state): State<AppState>,
    Query(params): Query<KeywordParams>,
) -> Result<Json<KeywordsResponse>, AppError> {
    let min_matches = params
        .min_matches
        .unwrap_or(state.config.keywords.min_matches);
    let keywords = keywords::keyword_summary(state.corpus.pool(), min_matches).await?;
    Ok(Json(KeywordsResponse { keywords }))
}

async fn handle_keyword_detail(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
    Query(params): Query<KeywordParams>,
) -> Result<Json<KeywordDetailResponse>, AppError> {
    let limit = params.limit.unwrap_or(state.config.keywords.detail_limit);
    if limit < 1 {
        return Err(bad_request("limit must be >= 1"));
    }
    let files = keywords::keyword_hits(state.corpus.pool(), &keyword, limit).await?;
    Ok(Json(KeywordDetailResponse { keyword, files }))
}
