//! End-to-end tests for the `sec` binary.

mod common;

use common::{seed, setup_env, AAPL_10K_2023};
use serde_json::Value;
use std::path::Path;
use std::process::Command;

fn run_sec(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = env!("CARGO_BIN_EXE_sec");
    let output = Command::new(binary)
        .arg("--config")
        .arg(config_path)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run sec binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn run_json(config_path: &Path, args: &[&str]) -> Value {
    let (stdout, stderr, success) = run_sec(config_path, args);
    assert!(success, "{:?} failed: stdout={}, stderr={}", args, stdout, stderr);
    serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("stdout is not JSON ({}): {}", e, stdout))
}

#[test]
fn test_init_idempotent() {
    let env = setup_env("127.0.0.1:0", "/sec");

    let (stdout, stderr, success) = run_sec(&env.config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
    assert!(env.tmp.path().join("data").join("sec.sqlite").exists());

    let (_, _, success) = run_sec(&env.config_path, &["init"]);
    assert!(success, "Second init failed (not idempotent)");
}

#[test]
fn test_missing_config_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_sec(&tmp.path().join("nope.toml"), &["tickers"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"));
}

#[tokio::test]
async fn test_query_commands() {
    let env = setup_env("127.0.0.1:0", "/sec");
    seed(&env.config).await;

    let tickers = run_json(&env.config_path, &["tickers"]);
    assert_eq!(tickers["apiVersion"], "0.1");
    assert_eq!(tickers["data"]["totalItems"], 2);

    let ticker = run_json(&env.config_path, &["ticker", "aapl"]);
    assert_eq!(ticker["data"]["attributes"]["cik"], 320193);
    assert_eq!(ticker["data"]["links"]["self"], "/sec/tickers/AAPL/");

    let sub = run_json(&env.config_path, &["sub", AAPL_10K_2023]);
    assert_eq!(sub["data"]["attributes"]["filed"], "2023-11-03");
    assert_eq!(sub["data"]["attributes"]["accepted"], "2023-11-03 10:00:00");

    let subs = run_json(&env.config_path, &["subs", "--ticker", "AAPL"]);
    assert_eq!(subs["data"]["totalItems"], 2);
    assert_eq!(subs["params"]["form"], "10-K");

    let q2 = run_json(
        &env.config_path,
        &["subs", "--ticker", "AAPL", "--year", "2023", "--qtr", "Q2"],
    );
    assert_eq!(q2["data"]["totalItems"], 1);
    assert_eq!(q2["data"]["items"][0]["attributes"]["fp"], "Q2");

    let nums = run_json(
        &env.config_path,
        &["nums", "--ticker", "AAPL", "--year", "2023", "--tag", "Assets"],
    );
    assert_eq!(nums["data"]["totalItems"], 1);
    assert_eq!(nums["data"]["items"][0]["id"], "num-1");

    let num = run_json(&env.config_path, &["num", "num-6"]);
    assert_eq!(num["data"]["attributes"]["value"], "10-K");
    assert_eq!(
        num["data"]["relationships"]["SUB"]["links"]["self"],
        format!("/sec/subs/{}/", AAPL_10K_2023)
    );
}

#[tokio::test]
async fn test_not_found_exits_with_error() {
    let env = setup_env("127.0.0.1:0", "/sec");
    seed(&env.config).await;

    let (stdout, stderr, success) = run_sec(&env.config_path, &["sub", "0000000000-00-000000"]);
    assert!(!success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Error: Accession Number 0000000000-00-000000 not found"));

    let (_, stderr, success) = run_sec(
        &env.config_path,
        &["subs", "--ticker", "AAPL", "--qtr", "Q2"],
    );
    assert!(!success);
    assert!(stderr.contains("Error: year required for quarterly form"));

    let (_, stderr, success) = run_sec(
        &env.config_path,
        &["nums", "--ticker", "MSFT", "--tag", "Assets"],
    );
    assert!(!success);
    assert!(stderr.contains("Error: No SUBs found for Ticker MSFT"));
}
