//! Shared fixtures for the integration tests: a temp workspace with config,
//! ticker dataset, and a seeded SQLite database.

#![allow(dead_code)]

use sec_filings::config::Config;
use sec_filings::{db, migrate};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const AAPL_10K_2022: &str = "0000320193-22-000108";
pub const AAPL_10K_2023: &str = "0000320193-23-000106";
pub const AAPL_10Q_2023_Q2: &str = "0000320193-23-000064";

const TICKERS: &str = r#"{
  "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
  "1": {"cik_str": 789019, "ticker": "MSFT", "title": "MICROSOFT CORP"},
  "2": {"cik_str": 1045810, "ticker": "NVDA", "title": "NVIDIA CORP"},
  "3": {"ticker": "BROKEN"}
}"#;

pub struct TestEnv {
    pub tmp: TempDir,
    pub config_path: PathBuf,
    pub config: Config,
}

/// Write config + dataset into a fresh temp dir. `bind` and `base_path` go
/// straight into `[server]`.
pub fn setup_env(bind: &str, base_path: &str) -> TestEnv {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    let tickers_path = root.join("company_tickers.json");
    fs::write(&tickers_path, TICKERS).unwrap();

    let config_content = format!(
        r#"[db]
path = "{}"

[tickers]
path = "{}"
symbols = ["AAPL", "MSFT", "ZZZZ"]

[server]
bind = "{}"
base_path = "{}"

[logging]
level = "warn"
"#,
        root.join("data").join("sec.sqlite").display(),
        tickers_path.display(),
        bind,
        base_path
    );
    let config_path = root.join("sec.toml");
    fs::write(&config_path, &config_content).unwrap();
    let config: Config = toml::from_str(&config_content).unwrap();

    TestEnv {
        tmp,
        config_path,
        config,
    }
}

/// Create the schema and load Apple's filings.
pub async fn seed(config: &Config) {
    migrate::run_migrations(config).await.unwrap();
    let pool = db::connect(config).await.unwrap();

    let subs = [
        // adsh, form, fy, fp, filed, period, accepted
        (AAPL_10K_2022, "10-K", 2022, "FY", 1666915200000_i64, 1663977600000_i64, 1666953000000_i64),
        (AAPL_10K_2023, "10-K", 2023, "FY", 1698969600000, 1696032000000, 1699005600000),
        (AAPL_10Q_2023_Q2, "10-Q", 2023, "Q2", 1683244800000, 1680307200000, 1683280800000),
    ];
    for (adsh, form, fy, fp, filed, period, accepted) in subs {
        sqlx::query(
            "INSERT INTO submissions (id, adsh, cik, name, form, fy, fp, filed, period, accepted)
             VALUES (?, ?, 320193, 'APPLE INC', ?, ?, ?, ?, ?, ?)",
        )
        .bind(format!("sub-{}", adsh))
        .bind(adsh)
        .bind(form)
        .bind(fy)
        .bind(fp)
        .bind(filed)
        .bind(period)
        .bind(accepted)
        .execute(&pool)
        .await
        .unwrap();
    }

    let facts = [
        ("num-1", AAPL_10K_2023, "Assets", 1696032000000_i64, "352583000000"),
        ("num-2", AAPL_10K_2023, "AssetsCurrent", 1663977600000, "135405000000"),
        ("num-3", AAPL_10K_2023, "Revenues", 1696032000000, "383285000000"),
        ("num-4", AAPL_10K_2022, "Assets", 1663977600000, "352755000000"),
        ("num-5", AAPL_10Q_2023_Q2, "Revenues", 1680307200000, "94836000000"),
        ("num-6", AAPL_10K_2023, "DocumentType", 1696032000000, "\"10-K\""),
    ];
    for (id, adsh, tag, ddate, value) in facts {
        sqlx::query(
            "INSERT INTO facts (id, adsh, tag, version, ddate, qtrs, uom, value)
             VALUES (?, ?, ?, 'us-gaap/2023', ?, 0, 'USD', ?)",
        )
        .bind(id)
        .bind(adsh)
        .bind(tag)
        .bind(ddate)
        .bind(value)
        .execute(&pool)
        .await
        .unwrap();
    }

    pool.close().await;
}
