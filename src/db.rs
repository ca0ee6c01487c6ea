use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::config::Config;
use crate::error::CorpusError;

/// Open the corpus database read-only.
///
/// The pool is created once per process and passed to every consumer. A
/// missing file is reported as [`CorpusError::StorageUnavailable`]; nothing is
/// ever created or migrated.
pub async fn connect(config: &Config) -> Result<SqlitePool, CorpusError> {
    let db_path = &config.db.path;

    if !db_path.exists() {
        return Err(CorpusError::StorageUnavailable(format!(
            "database not found: {}",
            db_path.display()
        )));
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
        .read_only(true)
        .create_if_missing(false);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!(path = %db_path.display(), "opened corpus database read-only");
    Ok(pool)
}
