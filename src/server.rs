//! HTTP API server.
//!
//! Serves the filings query service as JSON over HTTP. Query routes are
//! nested under the configured base path (`/sec` by default); `/health`
//! always sits at the root.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `{base}/tickers/?scope=Y` | Supported tickers |
//! | `GET`  | `{base}/tickers/{ticker}/` | One ticker (empty `data` if unknown) |
//! | `GET`  | `{base}/subs/{adsh}/` | One submission by accession number |
//! | `GET`  | `{base}/subs/?ticker&year&qtr` | Annual or quarterly submissions |
//! | `GET`  | `{base}/nums/{id}` | One fact by id |
//! | `GET`  | `{base}/nums/?ticker&year&qtr&tag` | Facts of matching submissions |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! Routes are also reachable without the trailing slash.
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "No NUM found for abc" } }
//! ```
//!
//! Error codes: `invalid_argument` (404), `not_found` (404),
//! `store_error` (500), `internal` (500). Invalid arguments share the 404
//! status with missing resources.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support browser-based
//! clients.

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
use tower_http::trace::TraceLayer;

use sec_filings_core::resource::{ApiResponse, Collection, MaybeResource, Resource};
use sec_filings_core::service::{parse_year, FilingsRequest, QueryService};
use sec_filings_core::QueryError;

use crate::app;
use crate::config::Config;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    service: Arc<QueryService>,
}

/// Starts the HTTP server.
///
/// Loads the ticker dataset, opens the database, and binds to
/// `[server].bind`. Runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let service = app::open_service(config).await?;
    let router = build_router(Arc::new(service), &config.server.base_path);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!(
        bind = %config.server.bind,
        base_path = %config.server.base_path,
        "server listening"
    );
    axum::serve(listener, router).await?;

    Ok(())
}

/// Build the router for `service`, with query routes under `base_path`.
pub fn build_router(service: Arc<QueryService>, base_path: &str) -> Router {
    let state = AppState { service };

    let api = Router::new()
        .route("/tickers/", get(handle_tickers))
        .route("/tickers", get(handle_tickers))
        .route("/tickers/{ticker}/", get(handle_ticker))
        .route("/tickers/{ticker}", get(handle_ticker))
        .route("/subs/", get(handle_subs))
        .route("/subs", get(handle_subs))
        .route("/subs/{adsh}/", get(handle_sub))
        .route("/subs/{adsh}", get(handle_sub))
        .route("/nums/", get(handle_nums))
        .route("/nums", get(handle_nums))
        .route("/nums/{id}", get(handle_num))
        .route("/nums/{id}/", get(handle_num));

    let root = Router::new().route("/health", get(handle_health));
    let app = if base_path.is_empty() {
        root.merge(api)
    } else {
        root.nest(base_path, api)
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"invalid_argument"`, `"not_found"`).
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        if err.is_client_error() {
            tracing::debug!(code = err.code(), message = %err, "request rejected");
            return AppError {
                status: StatusCode::NOT_FOUND,
                code: err.code().to_string(),
                message: err.to_string(),
            };
        }

        let code = match err {
            QueryError::Store(ref source) => {
                tracing::error!(error = ?source, "store query failed");
                err.code()
            }
            _ => {
                tracing::error!(error = %err, "request failed");
                "internal"
            }
        };
        AppError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: code.to_string(),
            message: err.to_string(),
        }
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

// ============ tickers ============

#[derive(Deserialize)]
struct ScopeParams {
    scope: Option<String>,
}

async fn handle_tickers(
    State(state): State<AppState>,
    Query(params): Query<ScopeParams>,
) -> Result<Json<ApiResponse<Collection>>, AppError> {
    Ok(Json(state.service.supported_tickers(params.scope.as_deref())?))
}

async fn handle_ticker(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Json<ApiResponse<MaybeResource>> {
    Json(state.service.ticker(&ticker))
}

// ============ subs / nums ============

/// Raw query string; `year` is parsed by hand so a bad value gets the
/// API's error body instead of Axum's rejection.
#[derive(Deserialize)]
struct FilingsParams {
    ticker: Option<String>,
    year: Option<String>,
    qtr: Option<String>,
    tag: Option<String>,
}

impl FilingsParams {
    fn into_request(self) -> Result<FilingsRequest, QueryError> {
        Ok(FilingsRequest {
            year: parse_year(self.year.as_deref())?,
            ticker: self.ticker,
            qtr: self.qtr,
            tag: self.tag,
        })
    }
}

async fn handle_sub(
    State(state): State<AppState>,
    Path(adsh): Path<String>,
) -> Result<Json<ApiResponse<Resource>>, AppError> {
    Ok(Json(state.service.submission(&adsh).await?))
}

async fn handle_subs(
    State(state): State<AppState>,
    Query(params): Query<FilingsParams>,
) -> Result<Json<ApiResponse<Collection>>, AppError> {
    let request = params.into_request()?;
    Ok(Json(state.service.submissions(&request).await?))
}

async fn handle_num(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Resource>>, AppError> {
    Ok(Json(state.service.fact(&id).await?))
}

async fn handle_nums(
    State(state): State<AppState>,
    Query(params): Query<FilingsParams>,
) -> Result<Json<ApiResponse<Collection>>, AppError> {
    let request = params.into_request()?;
    Ok(Json(state.service.facts(&request).await?))
}
