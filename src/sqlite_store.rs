//! SQLite-backed [`Store`] implementation.
//!
//! Reads the `submissions` and `facts` tables created by [`crate::migrate`].
//! Stored `form` and `fp` codes are parsed into their enums here, so an
//! unknown code surfaces as a store error rather than reaching the query
//! layer.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use sec_filings_core::models::{Fact, FactValue, FiscalPeriod, Form, Submission};
use sec_filings_core::store::{FactFilter, Store, SubmissionFilter};

const SUBMISSION_COLUMNS: &str = "id, adsh, cik, name, form, fy, fp, filed, period, accepted";
const FACT_COLUMNS: &str = "id, adsh, tag, version, ddate, qtrs, uom, value";

/// SQLite implementation of the [`Store`] trait.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn submission_from_row(row: &SqliteRow) -> Result<Submission> {
    let adsh: String = row.try_get("adsh")?;
    let form_code: String = row.try_get("form")?;
    let form = Form::from_code(&form_code)
        .ok_or_else(|| anyhow!("submission {}: unknown form '{}'", adsh, form_code))?;
    let fp_code: String = row.try_get("fp")?;
    let fiscal_period = FiscalPeriod::parse(&fp_code)
        .ok_or_else(|| anyhow!("submission {}: unknown fiscal period '{}'", adsh, fp_code))?;
    let fy: i64 = row.try_get("fy")?;
    let fiscal_year =
        i32::try_from(fy).with_context(|| format!("submission {}: fiscal year {}", adsh, fy))?;

    Ok(Submission {
        id: row.try_get("id")?,
        accession_number: adsh,
        filer_id: row.try_get("cik")?,
        name: row.try_get("name")?,
        form,
        fiscal_year,
        fiscal_period,
        filed_at: row.try_get("filed")?,
        period_end_at: row.try_get("period")?,
        accepted_at: row.try_get("accepted")?,
    })
}

fn fact_from_row(row: &SqliteRow) -> Result<Fact> {
    let id: String = row.try_get("id")?;
    let raw_value: String = row.try_get("value")?;
    // Values are stored as JSON; bare text from older loads is kept as text.
    let value = serde_json::from_str::<FactValue>(&raw_value)
        .unwrap_or_else(|_| FactValue::Text(raw_value.clone()));

    Ok(Fact {
        id,
        accession_number: row.try_get("adsh")?,
        tag: row.try_get("tag")?,
        version: row.try_get("version")?,
        date_end: row.try_get("ddate")?,
        qtrs: row.try_get("qtrs")?,
        uom: row.try_get("uom")?,
        value,
    })
}

#[async_trait]
impl Store for SqliteStore {
    async fn get_submission(&self, accession_number: &str) -> Result<Option<Submission>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM submissions WHERE adsh = ?",
            SUBMISSION_COLUMNS
        ))
        .bind(accession_number)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(submission_from_row).transpose()
    }

    async fn find_submissions(&self, filter: &SubmissionFilter) -> Result<Vec<Submission>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM submissions WHERE cik = ",
            SUBMISSION_COLUMNS
        ));
        qb.push_bind(filter.filer_id);
        qb.push(" AND form = ").push_bind(filter.form.code());
        if let Some(fy) = filter.fiscal_year {
            qb.push(" AND fy = ").push_bind(fy);
        }
        if let Some(fp) = filter.fiscal_period {
            qb.push(" AND fp = ").push_bind(fp.as_str());
        }
        qb.push(" ORDER BY rowid ASC");

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(submission_from_row).collect()
    }

    async fn get_fact(&self, id: &str) -> Result<Option<Fact>> {
        let row = sqlx::query(&format!("SELECT {} FROM facts WHERE id = ?", FACT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(fact_from_row).transpose()
    }

    async fn find_facts(&self, filter: &FactFilter) -> Result<Vec<Fact>> {
        if filter.accession_numbers.is_empty() || filter.limit == 0 {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM facts WHERE adsh IN (", FACT_COLUMNS));
        let mut separated = qb.separated(", ");
        for adsh in &filter.accession_numbers {
            separated.push_bind(adsh.as_str());
        }
        separated.push_unseparated(")");

        match &filter.tag_range {
            Some(range) => {
                qb.push(" AND tag >= ").push_bind(range.start.as_str());
                qb.push(" AND tag < ").push_bind(range.end.as_str());
                qb.push(" ORDER BY tag ASC, rowid ASC");
            }
            None => {
                qb.push(" ORDER BY rowid ASC");
            }
        }
        qb.push(" LIMIT ")
            .push_bind(i64::try_from(filter.limit).unwrap_or(i64::MAX));

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(fact_from_row).collect()
    }
}
