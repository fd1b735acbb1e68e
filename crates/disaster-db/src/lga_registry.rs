//! Read-only lookups against `lga_registry`.

use disaster_core::StateCode;
use sqlx::PgPool;

use crate::DbError;

/// Finds the LGA code whose name contains `area_name` (case-insensitive)
/// within `state`. Returns the first match by code, or `None`.
///
/// `%` and `_` in the area name match literally.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_lga_code(
    pool: &PgPool,
    area_name: &str,
    state: StateCode,
) -> Result<Option<String>, DbError> {
    let pattern = format!("%{}%", escape_like(area_name.trim()));

    let code = sqlx::query_scalar::<_, String>(
        "SELECT lga_code FROM lga_registry \
         WHERE lga_name ILIKE $1 AND state_code = $2 \
         ORDER BY lga_code \
         LIMIT 1",
    )
    .bind(pattern)
    .bind(state.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(code)
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
