//! Typed records read from the ticker dataset and the filings store.
//!
//! Field names on the wire follow the SEC financial-statement data sets
//! (`adsh`, `cik`, `fy`, `fp`, `ddate`, ...), so serializing a record
//! yields the attribute map exposed by the API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Periodic report form type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Form {
    /// Form 10-K.
    #[serde(rename = "10-K")]
    AnnualReport,
    /// Form 10-Q.
    #[serde(rename = "10-Q")]
    QuarterlyReport,
}

impl Form {
    /// The SEC form code, e.g. `10-K`.
    pub const fn code(self) -> &'static str {
        match self {
            Self::AnnualReport => "10-K",
            Self::QuarterlyReport => "10-Q",
        }
    }

    /// Parse a form code (`10-K` / `10-Q`, case-insensitive).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "10-K" => Some(Self::AnnualReport),
            "10-Q" => Some(Self::QuarterlyReport),
            _ => None,
        }
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Portion of the fiscal year a submission covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FiscalPeriod {
    FY,
    Q1,
    Q2,
    Q3,
    Q4,
}

impl FiscalPeriod {
    /// The four quarterly periods, in order.
    pub const QUARTERS: [Self; 4] = [Self::Q1, Self::Q2, Self::Q3, Self::Q4];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FY => "FY",
            Self::Q1 => "Q1",
            Self::Q2 => "Q2",
            Self::Q3 => "Q3",
            Self::Q4 => "Q4",
        }
    }

    /// Parse any fiscal period code, case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "FY" => Some(Self::FY),
            "Q1" => Some(Self::Q1),
            "Q2" => Some(Self::Q2),
            "Q3" => Some(Self::Q3),
            "Q4" => Some(Self::Q4),
            _ => None,
        }
    }

    /// Parse a quarter (`Q1`..`Q4`), rejecting `FY`.
    pub fn parse_quarter(value: &str) -> Option<Self> {
        Self::parse(value).filter(|p| p.is_quarter())
    }

    pub const fn is_quarter(self) -> bool {
        !matches!(self, Self::FY)
    }
}

impl fmt::Display for FiscalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the ticker dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickerRecord {
    /// Filer identifier (CIK).
    #[serde(rename = "cik")]
    pub filer_id: i64,
    /// Uppercased ticker symbol.
    pub ticker: String,
    /// Registrant display name.
    pub title: String,
}

/// A periodic submission (10-K or 10-Q).
///
/// Timestamps are epoch milliseconds, as stored by upstream ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// Store-assigned record identifier.
    pub id: String,
    #[serde(rename = "adsh")]
    pub accession_number: String,
    #[serde(rename = "cik")]
    pub filer_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub form: Form,
    #[serde(rename = "fy")]
    pub fiscal_year: i32,
    #[serde(rename = "fp")]
    pub fiscal_period: FiscalPeriod,
    #[serde(rename = "filed")]
    pub filed_at: i64,
    #[serde(rename = "period")]
    pub period_end_at: i64,
    #[serde(rename = "accepted")]
    pub accepted_at: i64,
}

/// Value of a reported fact: numeric for most tags, text for a few.
///
/// Numbers keep the JSON representation they were stored with, so an
/// integer amount is never re-emitted as a float.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    Number(serde_json::Number),
    Text(String),
}

impl From<i64> for FactValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for FactValue {
    /// Non-finite values have no JSON number form and become text.
    fn from(value: f64) -> Self {
        match serde_json::Number::from_f64(value) {
            Some(n) => Self::Number(n),
            None => Self::Text(value.to_string()),
        }
    }
}

impl From<&str> for FactValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A numeric fact ("tag") reported inside a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    /// Store-assigned record identifier.
    pub id: String,
    /// Accession number of the owning submission.
    #[serde(rename = "adsh")]
    pub accession_number: String,
    pub tag: String,
    /// Taxonomy release the tag belongs to, e.g. `us-gaap/2023`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// End date of the reported period, epoch milliseconds.
    #[serde(rename = "ddate")]
    pub date_end: i64,
    /// Duration of the reported period in quarters (0 for point-in-time).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qtrs: Option<i64>,
    /// Unit of measure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uom: Option<String>,
    pub value: FactValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_codes() {
        assert_eq!(Form::from_code("10-k"), Some(Form::AnnualReport));
        assert_eq!(Form::from_code(" 10-Q "), Some(Form::QuarterlyReport));
        assert_eq!(Form::from_code("8-K"), None);
        assert_eq!(Form::QuarterlyReport.to_string(), "10-Q");
    }

    #[test]
    fn test_quarter_parsing() {
        assert_eq!(FiscalPeriod::parse_quarter("q2"), Some(FiscalPeriod::Q2));
        assert_eq!(FiscalPeriod::parse_quarter("FY"), None);
        assert_eq!(FiscalPeriod::parse_quarter("Q5"), None);
        assert_eq!(FiscalPeriod::parse("fy"), Some(FiscalPeriod::FY));
    }

    #[test]
    fn test_submission_wire_names() {
        let sub = Submission {
            id: "doc-1".into(),
            accession_number: "0000320193-23-000106".into(),
            filer_id: 320193,
            name: None,
            form: Form::AnnualReport,
            fiscal_year: 2023,
            fiscal_period: FiscalPeriod::FY,
            filed_at: 0,
            period_end_at: 0,
            accepted_at: 0,
        };
        let value = serde_json::to_value(&sub).unwrap();
        assert_eq!(value["adsh"], "0000320193-23-000106");
        assert_eq!(value["cik"], 320193);
        assert_eq!(value["form"], "10-K");
        assert_eq!(value["fp"], "FY");
        assert!(value.get("name").is_none());
    }

    #[test]
    fn test_fact_value_untagged() {
        let n: FactValue = serde_json::from_str("352583000000.0").unwrap();
        assert_eq!(n, FactValue::from(352583000000.0));
        let t: FactValue = serde_json::from_str("\"see note 4\"").unwrap();
        assert_eq!(t, FactValue::Text("see note 4".into()));
    }

    #[test]
    fn test_fact_value_keeps_integers() {
        let n: FactValue = serde_json::from_str("352583000000").unwrap();
        assert_eq!(n, FactValue::from(352_583_000_000_i64));
        assert_eq!(serde_json::to_string(&n).unwrap(), "352583000000");

        let f: FactValue = serde_json::from_str("0.25").unwrap();
        assert_eq!(serde_json::to_string(&f).unwrap(), "0.25");

        assert_eq!(FactValue::from(f64::NAN), FactValue::Text("NaN".into()));
    }
}
