//! Persistence stage: LGA resolution and the declaration upsert.

use disaster_core::ValidatedRecord;
use disaster_db::{DeclarationUpsert, MAX_AUDIT_ERROR_DETAILS};

use super::store::DeclarationStore;

/// Per-run persistence counters.
#[derive(Debug, Default)]
pub(crate) struct PersistStage {
    source_system: String,
    saved: usize,
    errors: Vec<String>,
}

impl PersistStage {
    pub(crate) fn new(source_system: impl Into<String>) -> Self {
        Self {
            source_system: source_system.into(),
            ..Self::default()
        }
    }

    pub(crate) fn saved(&self) -> usize {
        self.saved
    }

    pub(crate) fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Upserts one record. Failures are counted, logged, and best-effort
    /// written to `scraper_errors`; they never propagate.
    pub(crate) async fn persist<S: DeclarationStore + Sync>(
        &mut self,
        store: &S,
        validated: &ValidatedRecord,
    ) {
        let lga_code = resolve_lga_code(store, validated).await;
        let row = DeclarationUpsert::from_record(validated, lga_code, &self.source_system);

        match store.upsert_declaration(&row).await {
            Ok(id) => {
                self.saved += 1;
                tracing::info!(
                    agrn = %row.agrn_reference,
                    id,
                    lga_code = %row.lga_code,
                    status = row.declaration_status.as_str(),
                    "declaration saved"
                );
            }
            Err(e) => {
                let message = format!("{}: {e}", row.agrn_reference);
                tracing::error!(
                    agrn = %row.agrn_reference,
                    error = %e,
                    "failed to save declaration"
                );
                self.errors.push(message.clone());
                record_error_best_effort(store, validated, &message).await;
            }
        }
    }

    /// Logs the run summary and best-effort writes a `scraper_audit` row.
    pub(crate) async fn finish<S: DeclarationStore + Sync>(&self, store: &S, run_name: &str) {
        tracing::info!(
            saved = self.saved,
            errors = self.errors.len(),
            first_errors = ?self.errors.iter().take(MAX_AUDIT_ERROR_DETAILS).collect::<Vec<_>>(),
            "persistence summary"
        );

        if let Err(e) = store
            .record_audit(run_name, self.saved, self.errors.len(), &self.errors)
            .await
        {
            tracing::warn!(error = %e, "failed to write scraper audit row");
        }
    }
}

/// Representative LGA code for a record: the registry match for its first
/// area (sorted order) within its state, else the state capital's code.
pub(crate) async fn resolve_lga_code<S: DeclarationStore + Sync>(
    store: &S,
    validated: &ValidatedRecord,
) -> String {
    let state = validated.state_code();
    let fallback = state.capital_lga_code();

    let Some(first_area) = validated.record().affected_areas.iter().next() else {
        return fallback.to_owned();
    };

    match store.find_lga_code(first_area, state).await {
        Ok(Some(code)) => code,
        Ok(None) => {
            tracing::debug!(area = %first_area, state = %state, "no LGA match; using capital");
            fallback.to_owned()
        }
        Err(e) => {
            tracing::warn!(
                area = %first_area,
                state = %state,
                error = %e,
                "LGA lookup failed; using capital"
            );
            fallback.to_owned()
        }
    }
}

async fn record_error_best_effort<S: DeclarationStore + Sync>(
    store: &S,
    validated: &ValidatedRecord,
    message: &str,
) {
    let agrn = validated.agrn_reference();
    let item_data = serde_json::to_value(validated.record())
        .unwrap_or_else(|_| serde_json::json!({ "agrn_reference": agrn }));

    if let Err(e) = store.record_error(Some(agrn), message, &item_data).await {
        tracing::warn!(agrn = %agrn, error = %e, "failed to record scraper error");
    }
}
