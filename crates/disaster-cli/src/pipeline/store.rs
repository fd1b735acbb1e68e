//! Storage seam used by the persistence stage.

use std::future::Future;

use disaster_core::StateCode;
use disaster_db::{DbError, DeclarationUpsert};
use sqlx::PgPool;

/// The database operations the pipeline needs. [`PgStore`] is the
/// production implementation.
pub(crate) trait DeclarationStore {
    fn find_lga_code(
        &self,
        area_name: &str,
        state: StateCode,
    ) -> impl Future<Output = Result<Option<String>, DbError>> + Send;

    fn upsert_declaration(
        &self,
        row: &DeclarationUpsert,
    ) -> impl Future<Output = Result<i64, DbError>> + Send;

    fn record_error(
        &self,
        agrn_reference: Option<&str>,
        error_message: &str,
        item_data: &serde_json::Value,
    ) -> impl Future<Output = Result<(), DbError>> + Send;

    fn record_audit(
        &self,
        scraper: &str,
        disasters_found: usize,
        errors: usize,
        error_details: &[String],
    ) -> impl Future<Output = Result<(), DbError>> + Send;
}

pub(crate) struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DeclarationStore for PgStore {
    fn find_lga_code(
        &self,
        area_name: &str,
        state: StateCode,
    ) -> impl Future<Output = Result<Option<String>, DbError>> + Send {
        disaster_db::find_lga_code(&self.pool, area_name, state)
    }

    fn upsert_declaration(
        &self,
        row: &DeclarationUpsert,
    ) -> impl Future<Output = Result<i64, DbError>> + Send {
        disaster_db::upsert_declaration(&self.pool, row)
    }

    fn record_error(
        &self,
        agrn_reference: Option<&str>,
        error_message: &str,
        item_data: &serde_json::Value,
    ) -> impl Future<Output = Result<(), DbError>> + Send {
        async move {
            disaster_db::insert_scraper_error(&self.pool, agrn_reference, error_message, item_data)
                .await
                .map(|_| ())
        }
    }

    fn record_audit(
        &self,
        scraper: &str,
        disasters_found: usize,
        errors: usize,
        error_details: &[String],
    ) -> impl Future<Output = Result<(), DbError>> + Send {
        async move {
            disaster_db::insert_scraper_audit(
                &self.pool,
                scraper,
                disasters_found,
                errors,
                error_details,
            )
            .await
            .map(|_| ())
        }
    }
}
