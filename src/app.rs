//! Wiring shared by the server and the query commands.

use anyhow::{Context, Result};
use std::sync::Arc;

use sec_filings_core::tickers::TickerIndex;
use sec_filings_core::QueryService;

use crate::config::Config;
use crate::db;
use crate::sqlite_store::SqliteStore;

/// Load the ticker dataset named by `[tickers].path`.
pub fn load_tickers(config: &Config) -> Result<TickerIndex> {
    let index = TickerIndex::load(&config.tickers.path)
        .with_context(|| format!("Failed to load tickers from {}", config.tickers.path.display()))?;

    if index.skipped() > 0 {
        tracing::warn!(
            skipped = index.skipped(),
            path = %config.tickers.path.display(),
            "skipped malformed or duplicate ticker rows"
        );
    }
    tracing::info!(tickers = index.len(), "ticker index loaded");

    Ok(index)
}

/// Build the query service over the configured SQLite database.
pub async fn open_service(config: &Config) -> Result<QueryService> {
    let tickers = load_tickers(config)?;
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool);

    Ok(QueryService::new(
        Arc::new(store),
        Arc::new(tickers),
        config.service_settings(),
    ))
}
