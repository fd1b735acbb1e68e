//! Three-stage record pipeline: validate, persist, audit.
//!
//! Each record flows through the stages once and independently. A record
//! rejected by validation is dropped; a persistence failure is counted and
//! the record is still audited.

pub(crate) mod audit;
pub(crate) mod persist;
pub(crate) mod store;

use std::future::Future;
use std::path::Path;

use chrono::Utc;
use disaster_core::{validate_record, DisasterRecord};
use disaster_scraper::RecordSink;

use self::audit::AuditTrail;
use self::persist::PersistStage;
use self::store::DeclarationStore;

/// Totals reported once the pipeline is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PipelineSummary {
    pub received: usize,
    pub dropped: usize,
    pub saved: usize,
    pub errors: usize,
    pub audited: usize,
}

pub(crate) struct Pipeline<S> {
    store: S,
    run_name: String,
    received: usize,
    dropped: usize,
    persist: PersistStage,
    audit: AuditTrail,
}

impl<S: DeclarationStore + Send + Sync> Pipeline<S> {
    pub(crate) fn new(store: S, run_name: &str, source_system: &str) -> Self {
        Self {
            store,
            run_name: run_name.to_owned(),
            received: 0,
            dropped: 0,
            persist: PersistStage::new(source_system),
            audit: AuditTrail::new(run_name, Utc::now()),
        }
    }

    pub(crate) async fn process(&mut self, record: DisasterRecord) {
        self.received += 1;
        let agrn = record.agrn_reference.clone();

        let validated = match validate_record(record) {
            Ok(validated) => validated,
            Err(e) => {
                self.dropped += 1;
                tracing::warn!(agrn = %agrn, error = %e, "record dropped by validation");
                return;
            }
        };

        self.persist.persist(&self.store, &validated).await;
        self.audit.record(&validated);
    }

    /// Writes the persistence summary and the audit file. Neither write can
    /// fail the run.
    pub(crate) async fn finish(self, audit_dir: &Path) -> PipelineSummary {
        self.persist.finish(&self.store, &self.run_name).await;

        match self.audit.write(audit_dir, Utc::now()) {
            Ok(path) => tracing::info!(path = %path.display(), "audit log saved"),
            Err(e) => tracing::warn!(error = %format!("{e:#}"), "failed to write audit log"),
        }

        PipelineSummary {
            received: self.received,
            dropped: self.dropped,
            saved: self.persist.saved(),
            errors: self.persist.errors().len(),
            audited: self.audit.entries().len(),
        }
    }
}

impl<S: DeclarationStore + Send + Sync> RecordSink for Pipeline<S> {
    fn accept(&mut self, record: DisasterRecord) -> impl Future<Output = ()> + Send {
        self.process(record)
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
