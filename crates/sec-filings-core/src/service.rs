//! Query facade behind the external request surface.
//!
//! [`QueryService`] composes the ticker index, submission and fact queries,
//! and the resource formatter. Each method corresponds to one API route and
//! returns a ready-to-serialize [`ApiResponse`], or a [`QueryError`] that the
//! HTTP layer maps to a status code.
//!
//! | Method | Route |
//! |--------|-------|
//! | [`supported_tickers`](QueryService::supported_tickers) | `GET /tickers/?scope=Y` |
//! | [`ticker`](QueryService::ticker) | `GET /tickers/{ticker}/` |
//! | [`submission`](QueryService::submission) | `GET /subs/{adsh}/` |
//! | [`submissions`](QueryService::submissions) | `GET /subs/?ticker&year&qtr` |
//! | [`fact`](QueryService::fact) | `GET /nums/{id}` |
//! | [`facts`](QueryService::facts) | `GET /nums/?ticker&year&qtr&tag` |

use std::sync::Arc;

use serde_json::Value;

use crate::error::{QueryError, Result};
use crate::facts::{retain_year, FactQuery};
use crate::models::{Form, TickerRecord};
use crate::resource::{
    ApiResponse, Collection, MaybeResource, RequestParams, Resource, ResourceFormatter, FACT,
    SUBMISSION, TICKER,
};
use crate::store::Store;
use crate::submissions::{parse_quarter, SubmissionQuery, TICKER_REQUIRED};
use crate::tickers::TickerIndex;

/// Symbols listed by `GET /tickers/` when none are configured.
pub const DEFAULT_SYMBOLS: [&str; 7] = ["GOOG", "NVDA", "ADBE", "MSFT", "AMZN", "TSLA", "WMT"];

pub const DEFAULT_API_VERSION: &str = "0.1";

/// Settings that shape responses, decoupled from application config.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Version string stamped into every payload.
    pub api_version: String,
    /// Symbols listed by `GET /tickers/`.
    pub symbols: Vec<String>,
    /// Prefix for self links, e.g. `/sec`.
    pub base_path: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.to_string(),
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            base_path: String::new(),
        }
    }
}

/// Parameters of `GET /subs/` and `GET /nums/`.
#[derive(Debug, Clone, Default)]
pub struct FilingsRequest {
    pub ticker: Option<String>,
    pub year: Option<i32>,
    pub qtr: Option<String>,
    /// Tag-name prefix; only used by [`QueryService::facts`].
    pub tag: Option<String>,
}

/// Parse the `year` request parameter.
pub fn parse_year(value: Option<&str>) -> Result<Option<i32>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| QueryError::invalid_argument("invalid year")),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// The filings query facade.
#[derive(Clone)]
pub struct QueryService {
    tickers: Arc<TickerIndex>,
    submissions: SubmissionQuery,
    facts: FactQuery,
    formatter: ResourceFormatter,
    settings: ServiceSettings,
}

impl QueryService {
    pub fn new(store: Arc<dyn Store>, tickers: Arc<TickerIndex>, settings: ServiceSettings) -> Self {
        Self {
            submissions: SubmissionQuery::new(store.clone(), tickers.clone()),
            facts: FactQuery::new(store),
            formatter: ResourceFormatter::new(settings.base_path.clone()),
            tickers,
            settings,
        }
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    pub fn tickers(&self) -> &TickerIndex {
        &self.tickers
    }

    fn envelope<T>(
        &self,
        method: Option<&'static str>,
        params: Option<RequestParams>,
        data: T,
    ) -> ApiResponse<T> {
        ApiResponse {
            api_version: self.settings.api_version.clone(),
            method,
            params,
            data,
        }
    }

    /// The self link uses the dataset's ticker; `attributes.ticker` echoes
    /// the symbol as requested.
    fn ticker_resource(&self, record: &TickerRecord, requested: &str) -> Resource {
        let mut map = match serde_json::to_value(record) {
            Ok(Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        map.insert("id".to_string(), Value::from(record.filer_id));
        let mut resource = self.formatter.format(map, &TICKER);
        resource
            .attributes
            .insert("ticker".to_string(), Value::from(requested));
        resource
    }

    /// `GET /tickers/?scope=Y`: the configured symbols that resolve.
    pub fn supported_tickers(&self, scope: Option<&str>) -> Result<ApiResponse<Collection>> {
        let scope = scope.ok_or_else(|| {
            QueryError::invalid_argument("Scope argument (?scope=Y) is missing")
        })?;
        if !scope.trim().eq_ignore_ascii_case("Y") {
            return Err(QueryError::invalid_argument(
                "Only Y/y is supported for the scope argument",
            ));
        }

        let items: Vec<Resource> = self
            .settings
            .symbols
            .iter()
            .filter_map(|symbol| {
                self.tickers
                    .resolve(symbol)
                    .map(|record| self.ticker_resource(record, symbol))
            })
            .collect();
        Ok(self.envelope(None, None, Collection::from(items)))
    }

    /// `GET /tickers/{ticker}/`: empty `data` when the ticker is unknown.
    pub fn ticker(&self, symbol: &str) -> ApiResponse<MaybeResource> {
        let resource = self
            .tickers
            .resolve(symbol)
            .map(|record| self.ticker_resource(record, symbol));
        let params = RequestParams {
            ticker: Some(symbol.to_string()),
            ..Default::default()
        };
        self.envelope(Some("ticker.get"), Some(params), resource.into())
    }

    /// `GET /subs/{adsh}/`
    pub async fn submission(&self, adsh: &str) -> Result<ApiResponse<Resource>> {
        let sub = self
            .submissions
            .get(adsh)
            .await?
            .ok_or_else(|| QueryError::not_found(format!("Accession Number {} not found", adsh)))?;
        let params = RequestParams {
            adsh: Some(adsh.to_string()),
            ..Default::default()
        };
        let resource = self.formatter.format_record(&sub, &SUBMISSION);
        Ok(self.envelope(Some("subs.get"), Some(params), resource))
    }

    /// `GET /subs/?ticker&year&qtr`
    ///
    /// No `qtr` selects annual reports; a `qtr` selects quarterly reports and
    /// requires `year`. Zero matches is a `NotFound`.
    pub async fn submissions(&self, req: &FilingsRequest) -> Result<ApiResponse<Collection>> {
        let ticker = non_empty(req.ticker.as_deref())
            .ok_or_else(|| QueryError::invalid_argument(TICKER_REQUIRED))?;
        let qtr = non_empty(req.qtr.as_deref());
        let form = if qtr.is_some() {
            Form::QuarterlyReport
        } else {
            Form::AnnualReport
        };

        let subs = self
            .submissions
            .find(Some(ticker), form, req.year, qtr)
            .await?;
        if subs.is_empty() {
            return Err(QueryError::not_found(format!(
                "No SUB found for Ticker {} and for given inputs",
                ticker
            )));
        }

        let items: Vec<Resource> = subs
            .iter()
            .map(|sub| self.formatter.format_record(sub, &SUBMISSION))
            .collect();
        let params = RequestParams {
            ticker: Some(ticker.to_string()),
            year: req.year,
            form: Some(form.code().to_string()),
            qtr: qtr.map(str::to_ascii_uppercase),
            ..Default::default()
        };
        Ok(self.envelope(Some("subs.get"), Some(params), Collection::from(items)))
    }

    /// `GET /nums/{id}`
    pub async fn fact(&self, id: &str) -> Result<ApiResponse<Resource>> {
        let fact = self
            .facts
            .get(id)
            .await?
            .ok_or_else(|| QueryError::not_found(format!("No NUM found for {}", id)))?;
        let params = RequestParams {
            id: Some(id.to_string()),
            ..Default::default()
        };
        let resource = self.formatter.format_record(&fact, &FACT);
        Ok(self.envelope(Some("nums.get"), Some(params), resource))
    }

    /// `GET /nums/?ticker&year&qtr&tag`
    ///
    /// Resolves the submissions first (annual unless `qtr` is given), then
    /// fetches their facts. With a `year`, facts dated outside that calendar
    /// year are dropped after retrieval.
    pub async fn facts(&self, req: &FilingsRequest) -> Result<ApiResponse<Collection>> {
        let ticker = non_empty(req.ticker.as_deref())
            .ok_or_else(|| QueryError::invalid_argument(TICKER_REQUIRED))?;
        let quarter = non_empty(req.qtr.as_deref()).map(parse_quarter).transpose()?;
        let tag = req.tag.as_deref().filter(|t| !t.is_empty());
        let form = if quarter.is_some() {
            Form::QuarterlyReport
        } else {
            Form::AnnualReport
        };

        let subs = self
            .submissions
            .find(Some(ticker), form, req.year, quarter.map(|q| q.as_str()))
            .await?;
        if subs.is_empty() {
            return Err(QueryError::not_found(format!(
                "No SUBs found for Ticker {}",
                ticker
            )));
        }

        let accession_numbers: Vec<String> =
            subs.into_iter().map(|s| s.accession_number).collect();
        let mut facts = self.facts.find(&accession_numbers, tag).await?;
        if facts.is_empty() {
            return Err(QueryError::not_found(format!(
                "No tag values found for Ticker {} and {} for given inputs",
                ticker,
                tag.unwrap_or("any tag")
            )));
        }
        if let Some(year) = req.year {
            facts = retain_year(facts, year);
        }

        let items: Vec<Resource> = facts
            .iter()
            .map(|fact| self.formatter.format_record(fact, &FACT))
            .collect();
        let params = RequestParams {
            ticker: Some(ticker.to_string()),
            year: req.year,
            form: Some(form.code().to_string()),
            qtr: quarter.map(|q| q.as_str().to_string()),
            tag: tag.map(str::to_string),
            ..Default::default()
        };
        Ok(self.envelope(Some("nums.get"), Some(params), Collection::from(items)))
    }
}
