//! Ticker symbol → filer identifier index.
//!
//! Loaded once at startup from the SEC `company_tickers.json` dataset and
//! never mutated afterwards, so a single `Arc<TickerIndex>` can be shared
//! across any number of concurrent requests.
//!
//! The dataset is a top-level object whose values are rows:
//!
//! ```json
//! { "0": { "cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc." } }
//! ```
//!
//! A top-level array of rows is accepted as well. Rows that fail to parse
//! are skipped and counted; a malformed top-level structure is fatal.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{QueryError, Result};
use crate::models::TickerRecord;

#[derive(Debug, Deserialize)]
struct TickerRow {
    #[serde(deserialize_with = "int_or_numeric_string")]
    cik_str: i64,
    ticker: String,
    title: String,
}

fn int_or_numeric_string<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Str(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Int(n) => Ok(n),
        Raw::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Case-insensitive, read-only ticker index.
#[derive(Debug, Default)]
pub struct TickerIndex {
    by_ticker: HashMap<String, TickerRecord>,
    skipped: usize,
}

impl TickerIndex {
    /// Load the index from a `company_tickers.json` file.
    ///
    /// # Errors
    ///
    /// [`QueryError::DataLoad`] if the file cannot be read, is not JSON, or
    /// its top-level value is neither an object nor an array.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            QueryError::DataLoad(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&content)
    }

    /// Parse the index from dataset JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(json)
            .map_err(|e| QueryError::DataLoad(format!("invalid JSON: {}", e)))?;

        let rows: Vec<Value> = match root {
            Value::Object(map) => map.into_iter().map(|(_, row)| row).collect(),
            Value::Array(rows) => rows,
            other => {
                return Err(QueryError::DataLoad(format!(
                    "expected an object or array of ticker rows, found {}",
                    json_kind(&other)
                )))
            }
        };

        let mut index = Self::default();
        for row in rows {
            match serde_json::from_value::<TickerRow>(row) {
                Ok(row) => {
                    let record = TickerRecord {
                        filer_id: row.cik_str,
                        ticker: normalize(&row.ticker),
                        title: row.title,
                    };
                    if !index.insert(record) {
                        index.skipped += 1;
                    }
                }
                Err(_) => index.skipped += 1,
            }
        }
        Ok(index)
    }

    /// Build an index directly from records (first record wins on duplicates).
    pub fn from_records(records: impl IntoIterator<Item = TickerRecord>) -> Self {
        let mut index = Self::default();
        for mut record in records {
            record.ticker = normalize(&record.ticker);
            if !index.insert(record) {
                index.skipped += 1;
            }
        }
        index
    }

    fn insert(&mut self, record: TickerRecord) -> bool {
        if record.ticker.is_empty() || self.by_ticker.contains_key(&record.ticker) {
            return false;
        }
        self.by_ticker.insert(record.ticker.clone(), record);
        true
    }

    /// Look up a ticker, ignoring case and surrounding whitespace.
    pub fn resolve(&self, ticker: &str) -> Option<&TickerRecord> {
        self.by_ticker.get(&normalize(ticker))
    }

    pub fn filer_id_for(&self, ticker: &str) -> Option<i64> {
        self.resolve(ticker).map(|r| r.filer_id)
    }

    pub fn title_for(&self, ticker: &str) -> Option<&str> {
        self.resolve(ticker).map(|r| r.title.as_str())
    }

    pub fn len(&self) -> usize {
        self.by_ticker.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_ticker.is_empty()
    }

    /// Number of dataset rows dropped as malformed or duplicate.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

fn normalize(ticker: &str) -> String {
    ticker.trim().to_uppercase()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DATASET: &str = r#"{
        "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
        "1": {"cik_str": 789019, "ticker": "MSFT", "title": "MICROSOFT CORP"},
        "2": {"cik_str": "1652044", "ticker": "GOOG", "title": "Alphabet Inc."},
        "3": {"ticker": "BROKEN"},
        "4": {"cik_str": 1, "ticker": "aapl", "title": "Duplicate"}
    }"#;

    #[test]
    fn test_resolve_any_case() {
        let index = TickerIndex::from_json_str(DATASET).unwrap();
        for symbol in ["AAPL", "aapl", "AaPl", " aapl "] {
            let rec = index.resolve(symbol).unwrap();
            assert_eq!(rec.filer_id, 320193);
            assert_eq!(rec.title, "Apple Inc.");
        }
        assert_eq!(index.filer_id_for("goog"), Some(1652044));
        assert_eq!(index.title_for("msft"), Some("MICROSOFT CORP"));
    }

    #[test]
    fn test_unknown_ticker_not_found() {
        let index = TickerIndex::from_json_str(DATASET).unwrap();
        assert!(index.resolve("ZZZZ").is_none());
        assert!(index.resolve("zzzz").is_none());
        assert!(index.resolve("BROKEN").is_none());
    }

    #[test]
    fn test_malformed_and_duplicate_rows_skipped() {
        let index = TickerIndex::from_json_str(DATASET).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.skipped(), 2);
    }

    #[test]
    fn test_array_dataset_accepted() {
        let json = r#"[{"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."}]"#;
        let index = TickerIndex::from_json_str(json).unwrap();
        assert_eq!(index.filer_id_for("AAPL"), Some(320193));
    }

    #[test]
    fn test_empty_dataset_accepted() {
        let index = TickerIndex::from_json_str("{}").unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_bad_top_level_is_fatal() {
        assert!(matches!(
            TickerIndex::from_json_str("42"),
            Err(QueryError::DataLoad(_))
        ));
        assert!(matches!(
            TickerIndex::from_json_str("{not json"),
            Err(QueryError::DataLoad(_))
        ));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let err = TickerIndex::load(&tmp.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, QueryError::DataLoad(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DATASET.as_bytes()).unwrap();
        let index = TickerIndex::load(file.path()).unwrap();
        assert_eq!(index.filer_id_for("aapl"), Some(320193));
    }
}
