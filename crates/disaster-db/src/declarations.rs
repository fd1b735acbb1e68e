//! Database operations for `disaster_declarations`.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use disaster_core::{AssistanceDetails, DisasterType, StateCode, ValidatedRecord};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::DbError;

pub const DECLARATION_AUTHORITY: &str = "Australian Government";
pub const DATA_SOURCE: &str = "disasterassist.gov.au";
pub const SEVERITY_LEVEL: i16 = 3;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// `expired` iff the declaration has an expiry date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationStatus {
    Active,
    Expired,
}

impl DeclarationStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
        }
    }
}

/// JSON stored in the `affected_areas` column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectedAreasBlob {
    /// Sorted area names.
    pub all_lgas: Vec<String>,
    pub lga_count: usize,
    pub assistance_details: AssistanceDetails,
    pub quick_info: BTreeMap<String, String>,
    pub checksum: String,
    pub extracted_at: DateTime<Utc>,
}

/// Storage row derived from a validated record. Every column is written on
/// each upsert; nothing is merged with an existing row.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclarationUpsert {
    pub agrn_reference: String,
    pub event_name: String,
    pub disaster_type: DisasterType,
    pub declaration_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub declaration_status: DeclarationStatus,
    pub declaration_authority: String,
    pub lga_code: String,
    pub state_code: StateCode,
    pub severity_level: i16,
    pub description: Option<String>,
    pub affected_areas: AffectedAreasBlob,
    pub source_url: String,
    pub verification_url: String,
    pub data_source: String,
    pub source_system: String,
    pub last_sync_timestamp: DateTime<Utc>,
}

impl DeclarationUpsert {
    #[must_use]
    pub fn from_record(
        validated: &ValidatedRecord,
        lga_code: impl Into<String>,
        source_system: &str,
    ) -> Self {
        let record = validated.record();
        let declaration_status = if record.expiry_date.is_some() {
            DeclarationStatus::Expired
        } else {
            DeclarationStatus::Active
        };

        Self {
            agrn_reference: record.agrn_reference.clone(),
            event_name: validated.event_name().to_owned(),
            disaster_type: record.disaster_type,
            declaration_date: record.declaration_date,
            expiry_date: record.expiry_date,
            declaration_status,
            declaration_authority: DECLARATION_AUTHORITY.to_owned(),
            lga_code: lga_code.into(),
            state_code: validated.state_code(),
            severity_level: SEVERITY_LEVEL,
            description: record.description.clone(),
            affected_areas: AffectedAreasBlob {
                all_lgas: record.affected_areas.iter().cloned().collect(),
                lga_count: record.area_count(),
                assistance_details: record.assistance_details.clone(),
                quick_info: record.quick_info.clone(),
                checksum: record.content_checksum.clone(),
                extracted_at: record.scraped_at,
            },
            source_url: record.source_url.clone(),
            verification_url: record.source_url.clone(),
            data_source: DATA_SOURCE.to_owned(),
            source_system: source_system.to_owned(),
            last_sync_timestamp: Utc::now(),
        }
    }
}

/// A row read back from `disaster_declarations`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DeclarationRow {
    pub id: i64,
    pub agrn_reference: String,
    pub event_name: String,
    pub disaster_type: String,
    pub declaration_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub declaration_status: String,
    pub lga_code: String,
    pub state_code: String,
    pub affected_areas: serde_json::Value,
    pub source_system: String,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Inserts or fully overwrites the declaration keyed by `agrn_reference`.
///
/// Returns the internal `id` of the upserted row.
///
/// # Errors
///
/// Returns [`DbError::Serialize`] if the `affected_areas` blob cannot be
/// encoded, or [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_declaration(pool: &PgPool, row: &DeclarationUpsert) -> Result<i64, DbError> {
    let affected_areas = serde_json::to_value(&row.affected_areas)?;

    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO disaster_declarations \
             (agrn_reference, event_name, disaster_type, declaration_date, expiry_date, \
              declaration_status, declaration_authority, lga_code, state_code, severity_level, \
              description, affected_areas, source_url, verification_url, data_source, \
              source_system, last_sync_timestamp) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, \
                 $11, $12::jsonb, $13, $14, $15, $16, $17) \
         ON CONFLICT (agrn_reference) DO UPDATE SET \
             event_name            = EXCLUDED.event_name, \
             disaster_type         = EXCLUDED.disaster_type, \
             declaration_date      = EXCLUDED.declaration_date, \
             expiry_date           = EXCLUDED.expiry_date, \
             declaration_status    = EXCLUDED.declaration_status, \
             declaration_authority = EXCLUDED.declaration_authority, \
             lga_code              = EXCLUDED.lga_code, \
             state_code            = EXCLUDED.state_code, \
             severity_level        = EXCLUDED.severity_level, \
             description           = EXCLUDED.description, \
             affected_areas        = EXCLUDED.affected_areas, \
             source_url            = EXCLUDED.source_url, \
             verification_url      = EXCLUDED.verification_url, \
             data_source           = EXCLUDED.data_source, \
             source_system         = EXCLUDED.source_system, \
             last_sync_timestamp   = EXCLUDED.last_sync_timestamp, \
             updated_at            = NOW() \
         RETURNING id",
    )
    .bind(&row.agrn_reference)
    .bind(&row.event_name)
    .bind(row.disaster_type.as_str())
    .bind(row.declaration_date)
    .bind(row.expiry_date)
    .bind(row.declaration_status.as_str())
    .bind(&row.declaration_authority)
    .bind(&row.lga_code)
    .bind(row.state_code.as_str())
    .bind(row.severity_level)
    .bind(&row.description)
    .bind(affected_areas)
    .bind(&row.source_url)
    .bind(&row.verification_url)
    .bind(&row.data_source)
    .bind(&row.source_system)
    .bind(row.last_sync_timestamp)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// AGRNs of every stored declaration that already has an expiry date.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_closed_agrns(pool: &PgPool) -> Result<HashSet<String>, DbError> {
    let agrns = sqlx::query_scalar::<_, String>(
        "SELECT agrn_reference FROM disaster_declarations WHERE expiry_date IS NOT NULL",
    )
    .fetch_all(pool)
    .await?;

    Ok(agrns.into_iter().collect())
}

/// Fetches one declaration by AGRN.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_declaration(
    pool: &PgPool,
    agrn_reference: &str,
) -> Result<Option<DeclarationRow>, DbError> {
    let row = sqlx::query_as::<_, DeclarationRow>(
        "SELECT id, agrn_reference, event_name, disaster_type, declaration_date, expiry_date, \
                declaration_status, lga_code, state_code, affected_areas, source_system, updated_at \
         FROM disaster_declarations \
         WHERE agrn_reference = $1",
    )
    .bind(agrn_reference)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
