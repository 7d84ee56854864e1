//! Fact retrieval scoped to a set of submissions.
//!
//! Results are capped at [`READ_LIMIT`] rows. The cap is a hard ceiling,
//! not a page size: there is no continuation cursor, so callers that hit it
//! must narrow the tag prefix or the submission set.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::Fact;
use crate::store::{FactFilter, Store, TagRange};

/// Maximum number of facts returned by a single [`FactQuery::find`].
pub const READ_LIMIT: usize = 100;

/// Retrieves facts by id or by owning submission.
#[derive(Clone)]
pub struct FactQuery {
    store: Arc<dyn Store>,
}

impl FactQuery {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn get(&self, id: &str) -> Result<Option<Fact>> {
        Ok(self.store.get_fact(id.trim()).await?)
    }

    /// Facts belonging to any of `accession_numbers`, optionally restricted
    /// to tags starting with `tag_prefix` (case-sensitive).
    ///
    /// An empty accession set returns an empty vector without querying the
    /// store. An empty prefix is treated as no prefix.
    pub async fn find(
        &self,
        accession_numbers: &[String],
        tag_prefix: Option<&str>,
    ) -> Result<Vec<Fact>> {
        let mut seen = HashSet::new();
        let accession_numbers: Vec<String> = accession_numbers
            .iter()
            .filter(|a| seen.insert(a.as_str()))
            .cloned()
            .collect();
        if accession_numbers.is_empty() {
            return Ok(Vec::new());
        }

        let filter = FactFilter {
            accession_numbers,
            tag_range: tag_prefix.filter(|p| !p.is_empty()).map(TagRange::prefix),
            limit: READ_LIMIT,
        };
        let mut facts = self.store.find_facts(&filter).await?;
        facts.truncate(READ_LIMIT);
        Ok(facts)
    }
}

/// Inclusive epoch-millisecond bounds of one calendar year in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    /// `YYYY-01-01T00:00:00.000Z`
    pub start_ms: i64,
    /// `YYYY-12-31T23:59:59.999Z`
    pub end_ms: i64,
}

impl YearRange {
    /// Bounds for `year`, or `None` if the year is outside chrono's range.
    pub fn for_year(year: i32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)?
            .and_hms_opt(0, 0, 0)?
            .and_utc()
            .timestamp_millis();
        let next = NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
            .and_hms_opt(0, 0, 0)?
            .and_utc()
            .timestamp_millis();
        Some(Self {
            start_ms: start,
            end_ms: next - 1,
        })
    }

    pub fn contains(&self, epoch_ms: i64) -> bool {
        (self.start_ms..=self.end_ms).contains(&epoch_ms)
    }
}

/// Keep only facts whose `ddate` falls within calendar year `year`.
pub fn retain_year(facts: Vec<Fact>, year: i32) -> Vec<Fact> {
    match YearRange::for_year(year) {
        Some(range) => facts
            .into_iter()
            .filter(|f| range.contains(f.date_end))
            .collect(),
        None => Vec::new(),
    }
}
