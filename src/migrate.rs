use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    create_schema(&pool).await?;
    pool.close().await;
    Ok(())
}

/// Create the filings tables and indexes. Idempotent.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    // One row per 10-K / 10-Q submission; timestamps are epoch milliseconds
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS submissions (
            id TEXT PRIMARY KEY,
            adsh TEXT NOT NULL UNIQUE,
            cik INTEGER NOT NULL,
            name TEXT,
            form TEXT NOT NULL,
            fy INTEGER NOT NULL,
            fp TEXT NOT NULL,
            filed INTEGER NOT NULL,
            period INTEGER NOT NULL,
            accepted INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Reported values; `value` holds JSON (number or string)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS facts (
            id TEXT PRIMARY KEY,
            adsh TEXT NOT NULL,
            tag TEXT NOT NULL,
            version TEXT,
            ddate INTEGER NOT NULL,
            qtrs INTEGER,
            uom TEXT,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_submissions_filer ON submissions(cik, form, fy, fp)",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_facts_adsh ON facts(adsh)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_facts_adsh_tag ON facts(adsh, tag)")
        .execute(pool)
        .await?;

    Ok(())
}
