//! # SEC Filings Core
//!
//! Store-agnostic query logic for the SEC filings service: typed records,
//! the [`store::Store`] abstraction, the ticker index, submission and fact
//! queries, and the resource formatter that shapes API responses.
//!
//! This crate contains no tokio, sqlx, or HTTP dependencies. The calling
//! application supplies a store implementation and a loaded
//! [`tickers::TickerIndex`], then drives everything through
//! [`service::QueryService`].
//!
//! ```text
//! request ──▶ QueryService ──▶ TickerIndex ──▶ SubmissionQuery ──▶ FactQuery
//!                  │                                                  │
//!                  └──────────────── ResourceFormatter ◀──────────────┘
//! ```

pub mod error;
pub mod facts;
pub mod models;
pub mod resource;
pub mod service;
pub mod store;
pub mod submissions;
pub mod tickers;

pub use error::{QueryError, Result};
pub use service::{QueryService, ServiceSettings};
