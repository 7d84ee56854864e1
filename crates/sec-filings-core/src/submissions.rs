//! Submission lookup: ticker + form + fiscal year + quarter.
//!
//! Parameters are validated before any store access. A ticker missing from
//! the index yields an empty result rather than an error; the boundary layer
//! decides whether an empty result becomes a 404.

use std::sync::Arc;

use crate::error::{QueryError, Result};
use crate::models::{FiscalPeriod, Form, Submission};
use crate::store::{Store, SubmissionFilter};
use crate::tickers::TickerIndex;

pub const TICKER_REQUIRED: &str = "ticker required";
pub const UNSUPPORTED_FORM: &str = "unsupported form";
pub const YEAR_REQUIRED: &str = "year required for quarterly form";
pub const INVALID_QUARTER: &str = "invalid quarter";

/// Parse a form code, failing with `InvalidArgument("unsupported form")`.
pub fn parse_form(code: &str) -> Result<Form> {
    Form::from_code(code).ok_or_else(|| QueryError::invalid_argument(UNSUPPORTED_FORM))
}

/// Parse a quarter (`Q1`..`Q4`, any case), failing with `InvalidArgument("invalid quarter")`.
pub fn parse_quarter(value: &str) -> Result<FiscalPeriod> {
    FiscalPeriod::parse_quarter(value).ok_or_else(|| QueryError::invalid_argument(INVALID_QUARTER))
}

/// Validate query parameters and build the store filter for a resolved filer.
///
/// Annual queries ignore `quarter` entirely, even when it is malformed.
pub fn build_filter(
    filer_id: i64,
    form: Form,
    fiscal_year: Option<i32>,
    quarter: Option<&str>,
) -> Result<SubmissionFilter> {
    let fiscal_period = match form {
        Form::AnnualReport => None,
        Form::QuarterlyReport => {
            if fiscal_year.is_none() {
                return Err(QueryError::invalid_argument(YEAR_REQUIRED));
            }
            let quarter = quarter.ok_or_else(|| QueryError::invalid_argument(INVALID_QUARTER))?;
            Some(parse_quarter(quarter)?)
        }
    };
    Ok(SubmissionFilter {
        filer_id,
        form,
        fiscal_year,
        fiscal_period,
    })
}

/// Resolves tickers to filers and retrieves their periodic submissions.
#[derive(Clone)]
pub struct SubmissionQuery {
    store: Arc<dyn Store>,
    tickers: Arc<TickerIndex>,
}

impl SubmissionQuery {
    pub fn new(store: Arc<dyn Store>, tickers: Arc<TickerIndex>) -> Self {
        Self { store, tickers }
    }

    /// Find the submissions of `form` filed by `ticker`'s registrant.
    ///
    /// Results come back in the store's order. An unknown ticker returns an
    /// empty vector; invalid parameters fail before the store is touched.
    pub async fn find(
        &self,
        ticker: Option<&str>,
        form: Form,
        fiscal_year: Option<i32>,
        quarter: Option<&str>,
    ) -> Result<Vec<Submission>> {
        let ticker = ticker
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| QueryError::invalid_argument(TICKER_REQUIRED))?;

        // Parameters are validated before the ticker is resolved.
        let mut filter = build_filter(0, form, fiscal_year, quarter)?;

        let Some(filer_id) = self.tickers.filer_id_for(ticker) else {
            return Ok(Vec::new());
        };
        filter.filer_id = filer_id;

        Ok(self.store.find_submissions(&filter).await?)
    }

    /// Retrieve one submission by accession number.
    pub async fn get(&self, accession_number: &str) -> Result<Option<Submission>> {
        Ok(self.store.get_submission(accession_number.trim()).await?)
    }
}
