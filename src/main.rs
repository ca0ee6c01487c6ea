//! # EFTA Explorer CLI (`efta`)
//!
//! ```bash
//! efta --config ./config/explorer.toml <command>
//! ```
//!
//! | Command | Description |
//! |---------|-------------|
//! | `efta search "<term>"` | Case-insensitive substring search with highlighted context |
//! | `efta get <id>` | Show a file's metadata and extracted text |
//! | `efta browse` | List files, filtered by dataset, name, and text status |
//! | `efta keywords` | Keyword hit summary |
//! | `efta keyword <kw>` | Files matching one keyword |
//! | `efta stats` | Corpus overview, fill rates, and distributions |
//! | `efta serve` | Start the JSON HTTP API |

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use efta_explorer::browse::{self, BrowseFilter, TextStatus};
use efta_explorer::corpus::SqliteCorpus;
use efta_explorer::progress::ProgressMode;
use efta_explorer::{config, db, get, keywords, search, server, stats};

/// EFTA Explorer: browse, summarize, and full-text search a read-only
/// corpus of released documents.
#[derive(Parser)]
#[command(name = "efta", version)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/explorer.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search all extracted text for a substring (case-insensitive).
    ///
    /// Prints each matching file with a window of context around the first
    /// match, the match itself wrapped in highlight markers.
    Search {
        /// Search term.
        query: String,

        /// Maximum number of files to return (defaults to `[search].limit`).
        #[arg(long)]
        limit: Option<usize>,

        /// Characters of context on each side of the match.
        #[arg(long)]
        window: Option<usize>,

        /// Progress output on stderr. Defaults to `human` on a TTY, else `off`.
        #[arg(long, value_enum)]
        progress: Option<ProgressMode>,
    },

    /// Show a file's metadata and full extracted text.
    Get {
        /// File ID.
        id: i64,
    },

    /// List files.
    Browse {
        /// Only files from this dataset.
        #[arg(long)]
        dataset: Option<i64>,

        /// Filename contains (case-insensitive).
        #[arg(long)]
        name: Option<String>,

        /// Text extraction status.
        #[arg(long, value_enum, default_value = "all")]
        status: TextStatus,

        /// Maximum number of rows (defaults to `[browse].limit`).
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Summarize keyword hits across all files.
    Keywords {
        /// Hide keywords with fewer total matches (defaults to `[keywords].min_matches`).
        #[arg(long)]
        min_matches: Option<i64>,
    },

    /// List the files that matched one keyword.
    Keyword {
        keyword: String,

        /// Maximum number of files (defaults to `[keywords].detail_limit`).
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Corpus overview, per-dataset breakdown, fill rates, and distributions.
    Stats,

    /// Start the JSON HTTP API on `[server].bind`.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "efta_explorer=info,efta=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    let pool = db::connect(&cfg).await?;
    let corpus = SqliteCorpus::new(pool);

    let result = match cli.command {
        Commands::Search {
            query,
            limit,
            window,
            progress,
        } => {
            let progress = progress.unwrap_or_else(ProgressMode::default_for_tty);
            search::run_search(&corpus, &cfg, &query, limit, window, progress).await
        }
        Commands::Get { id } => get::run_get(&corpus, id).await,
        Commands::Browse {
            dataset,
            name,
            status,
            limit,
        } => {
            let filter = BrowseFilter {
                dataset,
                name_contains: name,
                status,
            };
            let limit = limit.unwrap_or(cfg.browse.limit);
            browse::run_browse(corpus.pool(), &filter, limit).await
        }
        Commands::Keywords { min_matches } => {
            let min_matches = min_matches.unwrap_or(cfg.keywords.min_matches);
            keywords::run_keywords(corpus.pool(), min_matches).await
        }
        Commands::Keyword { keyword, limit } => {
            let limit = limit.unwrap_or(cfg.keywords.detail_limit);
            keywords::run_keyword_detail(corpus.pool(), &keyword, limit).await
        }
        Commands::Stats => stats::run_stats(corpus.pool(), &cfg).await,
        Commands::Serve => server::run_server(cfg.clone(), corpus.clone()).await,
    };

    corpus.close().await;
    result
}
