//! Append-only run logs: `scraper_errors` and `scraper_audit`.
//!
//! Callers treat both writes as best-effort; a failure here is logged and
//! never aborts a run.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// Maximum number of error messages kept in a `scraper_audit` row.
pub const MAX_AUDIT_ERROR_DETAILS: usize = 10;

/// A row from the `scraper_audit` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScraperAuditRow {
    pub id: i64,
    pub scraper: String,
    pub disasters_found: i32,
    pub errors: i32,
    pub error_details: serde_json::Value,
    pub completed_at: DateTime<Utc>,
}

/// Records one failed record with a JSON snapshot of what was being stored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_scraper_error(
    pool: &PgPool,
    agrn_reference: Option<&str>,
    error_message: &str,
    item_data: &serde_json::Value,
) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO scraper_errors (agrn_reference, error_message, item_data, occurred_at) \
         VALUES ($1, $2, $3::jsonb, NOW()) \
         RETURNING id",
    )
    .bind(agrn_reference)
    .bind(error_message)
    .bind(item_data)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Records the end-of-run summary. Only the first
/// [`MAX_AUDIT_ERROR_DETAILS`] error messages are stored.
///
/// # Errors
///
/// Returns [`DbError::Serialize`] if the messages cannot be encoded, or
/// [`DbError::Sqlx`] if the insert fails.
pub async fn insert_scraper_audit(
    pool: &PgPool,
    scraper: &str,
    disasters_found: usize,
    errors: usize,
    error_details: &[String],
) -> Result<ScraperAuditRow, DbError> {
    let details = serde_json::to_value(
        error_details
            .iter()
            .take(MAX_AUDIT_ERROR_DETAILS)
            .collect::<Vec<_>>(),
    )?;

    let row = sqlx::query_as::<_, ScraperAuditRow>(
        "INSERT INTO scraper_audit (scraper, disasters_found, errors, error_details, completed_at) \
         VALUES ($1, $2, $3, $4::jsonb, NOW()) \
         RETURNING id, scraper, disasters_found, errors, error_details, completed_at",
    )
    .bind(scraper)
    .bind(saturating_i32(disasters_found))
    .bind(saturating_i32(errors))
    .bind(details)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

fn saturating_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}
