//! # SEC Filings
//!
//! A query service over SEC periodic filings. It resolves stock tickers to
//! filer identifiers (CIK), lists a filer's annual (10-K) and quarterly
//! (10-Q) submissions, and returns the XBRL facts reported in them.
//!
//! The query logic lives in the `sec-filings-core` crate; this crate adds
//! configuration, logging, the SQLite store, the HTTP server, and the CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ company_     │──▶│ QueryService │◀──│ SqliteStore  │
//! │ tickers.json │   │   (core)     │   │ subs + facts │
//! └──────────────┘   └──────┬───────┘   └──────────────┘
//!                           │
//!                 ┌─────────┴─────────┐
//!                 ▼                   ▼
//!            ┌──────────┐       ┌──────────┐
//!            │   CLI    │       │   HTTP   │
//!            │  (sec)   │       │  (axum)  │
//!            └──────────┘       └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! sec init                              # create database
//! sec subs --ticker AAPL --year 2023    # annual reports
//! sec nums --ticker AAPL --tag Assets   # reported facts
//! sec serve                             # start HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |
//! | [`sqlite_store`] | SQLite `Store` implementation |
//! | [`app`] | Service wiring |
//! | [`query`] | CLI query commands |
//! | [`server`] | HTTP server |

pub mod app;
pub mod config;
pub mod db;
pub mod logging;
pub mod migrate;
pub mod query;
pub mod server;
pub mod sqlite_store;
