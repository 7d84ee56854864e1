//! Storage abstraction for the filings query layer.
//!
//! The [`Store`] trait is the narrow interface the core needs from the
//! external document store: equality filters over submissions, membership
//! and tag-range filters over facts, and a row cap. Implementations must be
//! `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Fact, FiscalPeriod, Form, Submission};

/// Upper bound appended to a tag prefix to form a lexicographic range.
///
/// `U+F8FF` sorts after every character used in taxonomy tag names, so
/// `[prefix, prefix + SENTINEL)` selects exactly the tags starting with
/// `prefix`.
pub const TAG_RANGE_SENTINEL: char = '\u{f8ff}';

/// Equality filter over the `submissions` collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFilter {
    pub filer_id: i64,
    pub form: Form,
    pub fiscal_year: Option<i32>,
    pub fiscal_period: Option<FiscalPeriod>,
}

impl SubmissionFilter {
    /// Evaluate the filter against one record.
    pub fn matches(&self, sub: &Submission) -> bool {
        sub.filer_id == self.filer_id
            && sub.form == self.form
            && self.fiscal_year.map_or(true, |fy| sub.fiscal_year == fy)
            && self.fiscal_period.map_or(true, |fp| sub.fiscal_period == fp)
    }
}

/// Half-open lexicographic range over fact tags: `start <= tag < end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRange {
    pub start: String,
    pub end: String,
}

impl TagRange {
    /// The range covering every tag that starts with `prefix`.
    pub fn prefix(prefix: &str) -> Self {
        let mut end = String::with_capacity(prefix.len() + TAG_RANGE_SENTINEL.len_utf8());
        end.push_str(prefix);
        end.push(TAG_RANGE_SENTINEL);
        Self {
            start: prefix.to_string(),
            end,
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        tag >= self.start.as_str() && tag < self.end.as_str()
    }
}

/// Membership and range filter over the `facts` collection.
///
/// When `tag_range` is set, results are ordered by tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactFilter {
    /// Accession numbers of the submissions whose facts are wanted.
    pub accession_numbers: Vec<String>,
    pub tag_range: Option<TagRange>,
    /// Maximum number of rows to return.
    pub limit: usize,
}

impl FactFilter {
    pub fn matches(&self, fact: &Fact) -> bool {
        self.accession_numbers
            .iter()
            .any(|a| *a == fact.accession_number)
            && self
                .tag_range
                .as_ref()
                .map_or(true, |range| range.contains(&fact.tag))
    }
}

/// Abstract read-only filings store.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`get_submission`](Store::get_submission) | One submission by accession number |
/// | [`find_submissions`](Store::find_submissions) | Submissions matching a [`SubmissionFilter`] |
/// | [`get_fact`](Store::get_fact) | One fact by record id |
/// | [`find_facts`](Store::find_facts) | Facts matching a [`FactFilter`] |
///
/// Every returned record carries the store-assigned `id`.
#[async_trait]
pub trait Store: Send + Sync {
    async fn get_submission(&self, accession_number: &str) -> Result<Option<Submission>>;

    /// Submissions matching `filter`, in the store's natural order.
    async fn find_submissions(&self, filter: &SubmissionFilter) -> Result<Vec<Submission>>;

    async fn get_fact(&self, id: &str) -> Result<Option<Fact>>;

    /// Facts matching `filter`, at most `filter.limit` rows.
    async fn find_facts(&self, filter: &FactFilter) -> Result<Vec<Fact>>;
}
