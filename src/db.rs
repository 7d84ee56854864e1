//! Connection pool for the filings database.
//!
//! The database file and its parent directory are created on first use so
//! `sec init` can run against an empty workspace. Queries only read from
//! it; rows are written by upstream ingestion.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;

use crate::config::Config;

const MAX_CONNECTIONS: u32 = 5;

/// Wait this long on a locked database before failing a query.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

fn connect_options(db_path: &Path) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT)
}

/// Open a pool on `[db].path`.
pub async fn connect(config: &Config) -> Result<SqlitePool> {
    let db_path = &config.db.path;

    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| {
            format!(
                "Failed to create filings database directory {}",
                parent.display()
            )
        })?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(connect_options(db_path))
        .await
        .with_context(|| format!("Failed to open filings database {}", db_path.display()))?;

    tracing::debug!(path = %db_path.display(), "filings database opened");
    Ok(pool)
}
