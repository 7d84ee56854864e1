//! In-memory [`Store`] implementation for testing and embedding.
//!
//! Records live in insertion order behind `std::sync::RwLock`; that order
//! is the store's natural return order. Tag-range queries are sorted by tag
//! before the row cap is applied, matching an ordered index scan.

use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::models::{Fact, Submission};

use super::{FactFilter, Store, SubmissionFilter};

/// In-memory filings store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    submissions: RwLock<Vec<Submission>>,
    facts: RwLock<Vec<Fact>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with the given records.
    pub fn with_records(submissions: Vec<Submission>, facts: Vec<Fact>) -> Self {
        Self {
            submissions: RwLock::new(submissions),
            facts: RwLock::new(facts),
        }
    }

    /// Insert or replace a submission, keyed by accession number.
    pub fn insert_submission(&self, sub: Submission) -> Result<()> {
        let mut subs = self
            .submissions
            .write()
            .map_err(|_| anyhow!("submission lock poisoned"))?;
        subs.retain(|s| s.accession_number != sub.accession_number);
        subs.push(sub);
        Ok(())
    }

    /// Insert or replace a fact, keyed by id.
    pub fn insert_fact(&self, fact: Fact) -> Result<()> {
        let mut facts = self
            .facts
            .write()
            .map_err(|_| anyhow!("fact lock poisoned"))?;
        facts.retain(|f| f.id != fact.id);
        facts.push(fact);
        Ok(())
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn get_submission(&self, accession_number: &str) -> Result<Option<Submission>> {
        let subs = self
            .submissions
            .read()
            .map_err(|_| anyhow!("submission lock poisoned"))?;
        Ok(subs
            .iter()
            .find(|s| s.accession_number == accession_number)
            .cloned())
    }

    async fn find_submissions(&self, filter: &SubmissionFilter) -> Result<Vec<Submission>> {
        let subs = self
            .submissions
            .read()
            .map_err(|_| anyhow!("submission lock poisoned"))?;
        Ok(subs.iter().filter(|s| filter.matches(s)).cloned().collect())
    }

    async fn get_fact(&self, id: &str) -> Result<Option<Fact>> {
        let facts = self
            .facts
            .read()
            .map_err(|_| anyhow!("fact lock poisoned"))?;
        Ok(facts.iter().find(|f| f.id == id).cloned())
    }

    async fn find_facts(&self, filter: &FactFilter) -> Result<Vec<Fact>> {
        let facts = self
            .facts
            .read()
            .map_err(|_| anyhow!("fact lock poisoned"))?;
        let mut matched: Vec<Fact> = facts.iter().filter(|f| filter.matches(f)).cloned().collect();
        if filter.tag_range.is_some() {
            matched.sort_by(|a, b| a.tag.cmp(&b.tag));
        }
        matched.truncate(filter.limit);
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FactValue, FiscalPeriod, Form};
    use crate::store::TagRange;

    fn sub(adsh: &str, cik: i64, form: Form, fy: i32, fp: FiscalPeriod) -> Submission {
        Submission {
            id: format!("sub-{}", adsh),
            accession_number: adsh.to_string(),
            filer_id: cik,
            name: None,
            form,
            fiscal_year: fy,
            fiscal_period: fp,
            filed_at: 0,
            period_end_at: 0,
            accepted_at: 0,
        }
    }

    fn fact(id: &str, adsh: &str, tag: &str) -> Fact {
        Fact {
            id: id.to_string(),
            accession_number: adsh.to_string(),
            tag: tag.to_string(),
            version: None,
            date_end: 0,
            qtrs: None,
            uom: None,
            value: FactValue::from(1_i64),
        }
    }

    #[tokio::test]
    async fn test_find_submissions_preserves_insertion_order() {
        let store = InMemoryStore::new();
        store
            .insert_submission(sub("b", 1, Form::AnnualReport, 2022, FiscalPeriod::FY))
            .unwrap();
        store
            .insert_submission(sub("a", 1, Form::AnnualReport, 2023, FiscalPeriod::FY))
            .unwrap();
        store
            .insert_submission(sub("c", 2, Form::AnnualReport, 2023, FiscalPeriod::FY))
            .unwrap();

        let filter = SubmissionFilter {
            filer_id: 1,
            form: Form::AnnualReport,
            fiscal_year: None,
            fiscal_period: None,
        };
        let found = store.find_submissions(&filter).await.unwrap();
        let adsh: Vec<&str> = found.iter().map(|s| s.accession_number.as_str()).collect();
        assert_eq!(adsh, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_insert_submission_replaces_by_accession() {
        let store = InMemoryStore::new();
        store
            .insert_submission(sub("a", 1, Form::AnnualReport, 2022, FiscalPeriod::FY))
            .unwrap();
        store
            .insert_submission(sub("a", 1, Form::AnnualReport, 2023, FiscalPeriod::FY))
            .unwrap();
        let got = store.get_submission("a").await.unwrap().unwrap();
        assert_eq!(got.fiscal_year, 2023);
    }

    #[tokio::test]
    async fn test_find_facts_range_sorted_and_limited() {
        let store = InMemoryStore::with_records(
            Vec::new(),
            vec![
                fact("1", "a", "AssetsNoncurrent"),
                fact("2", "a", "Liabilities"),
                fact("3", "a", "Assets"),
                fact("4", "b", "AssetsCurrent"),
                fact("5", "a", "AssetsCurrent"),
            ],
        );
        let filter = FactFilter {
            accession_numbers: vec!["a".to_string()],
            tag_range: Some(TagRange::prefix("Assets")),
            limit: 2,
        };
        let found = store.find_facts(&filter).await.unwrap();
        let tags: Vec<&str> = found.iter().map(|f| f.tag.as_str()).collect();
        assert_eq!(tags, vec!["Assets", "AssetsCurrent"]);
    }

    #[tokio::test]
    async fn test_get_fact_missing() {
        let store = InMemoryStore::new();
        assert!(store.get_fact("nope").await.unwrap().is_none());
    }
}
