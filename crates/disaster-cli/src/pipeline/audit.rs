//! Run audit stage: one entry per validated record, written as a JSON
//! summary file at the end of the run.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use disaster_core::ValidatedRecord;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct AuditEntry {
    pub agrn: String,
    pub name: String,
    /// Number of affected areas.
    pub lgas: usize,
    pub has_end_date: bool,
    pub checksum: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AuditReport<'a> {
    pub spider: &'a str,
    pub started: DateTime<Utc>,
    pub finished: DateTime<Utc>,
    pub total_disasters: usize,
    pub eligible_for_telehealth: usize,
    pub not_eligible: usize,
    pub disasters: &'a [AuditEntry],
}

#[derive(Debug)]
pub(crate) struct AuditTrail {
    run_name: String,
    started: DateTime<Utc>,
    entries: Vec<AuditEntry>,
}

impl AuditTrail {
    pub(crate) fn new(run_name: impl Into<String>, started: DateTime<Utc>) -> Self {
        Self {
            run_name: run_name.into(),
            started,
            entries: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, validated: &ValidatedRecord) {
        let record = validated.record();
        self.entries.push(AuditEntry {
            agrn: record.agrn_reference.clone(),
            name: validated.event_name().to_owned(),
            lgas: record.area_count(),
            has_end_date: record.expiry_date.is_some(),
            checksum: record.content_checksum.clone(),
        });
    }

    pub(crate) fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    pub(crate) fn report(&self, finished: DateTime<Utc>) -> AuditReport<'_> {
        let not_eligible = self.entries.iter().filter(|e| e.has_end_date).count();
        AuditReport {
            spider: &self.run_name,
            started: self.started,
            finished,
            total_disasters: self.entries.len(),
            eligible_for_telehealth: self.entries.len() - not_eligible,
            not_eligible,
            disasters: &self.entries,
        }
    }

    /// Writes `audit_<YYYYmmdd_HHMMSS>.json` into `dir` and returns its path.
    pub(crate) fn write(&self, dir: &Path, finished: DateTime<Utc>) -> anyhow::Result<PathBuf> {
        let path = dir.join(audit_file_name(finished));
        let json = serde_json::to_string_pretty(&self.report(finished))
            .context("failed to serialize audit report")?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write audit file {}", path.display()))?;
        Ok(path)
    }
}

pub(crate) fn audit_file_name(at: DateTime<Utc>) -> String {
    format!("audit_{}.json", at.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use chrono::{NaiveDate, TimeZone};
    use disaster_core::{
        validate_record, AssistanceDetails, DisasterRecord, DisasterType, StateCode,
    };

    use super::*;

    fn validated(agrn: &str, expiry: Option<NaiveDate>, areas: &[&str]) -> ValidatedRecord {
        validate_record(DisasterRecord {
            agrn_reference: agrn.to_string(),
            event_name: Some(format!("Event {agrn}")),
            disaster_type: DisasterType::Flood,
            state_code: Some(StateCode::Qld),
            declaration_date: None,
            expiry_date: expiry,
            affected_areas: areas.iter().map(|a| (*a).to_string()).collect::<BTreeSet<_>>(),
            assistance_details: AssistanceDetails::default(),
            quick_info: BTreeMap::new(),
            page_title: None,
            description: None,
            source_url: "https://example.com".to_string(),
            scraped_at: Utc::now(),
            content_checksum: format!("sum-{agrn}"),
        })
        .expect("valid record")
    }

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 7, h, m, s).unwrap()
    }

    #[test]
    fn file_name_uses_compact_timestamp() {
        assert_eq!(audit_file_name(at(9, 5, 3)), "audit_20250307_090503.json");
    }

    #[test]
    fn report_counts_eligibility() {
        let mut trail = AuditTrail::new("disasterassist", at(9, 0, 0));
        trail.record(&validated("AGRN-1", None, &["Brisbane"]));
        trail.record(&validated("AGRN-2", NaiveDate::from_ymd_opt(2025, 1, 1), &[]));
        trail.record(&validated("AGRN-3", None, &["Cairns", "Logan"]));

        let report = trail.report(at(9, 30, 0));
        assert_eq!(report.total_disasters, 3);
        assert_eq!(report.eligible_for_telehealth, 2);
        assert_eq!(report.not_eligible, 1);
        assert_eq!(report.disasters[2].lgas, 2);
        assert_eq!(report.disasters[0].name, "Event AGRN-1");
        assert_eq!(report.disasters[1].checksum, "sum-AGRN-2");
    }

    #[test]
    fn write_produces_pretty_json_file() {
        let dir = std::env::temp_dir().join(format!("disaster-audit-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut trail = AuditTrail::new("disasterassist", at(9, 0, 0));
        trail.record(&validated("AGRN-045", None, &["Brisbane"]));
        let path = trail.write(&dir, at(9, 1, 2)).unwrap();

        assert_eq!(path.file_name().unwrap(), "audit_20250307_090102.json");
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains('\n'), "expected pretty-printed JSON");
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["spider"], "disasterassist");
        assert_eq!(json["total_disasters"], 1);
        assert_eq!(json["eligible_for_telehealth"], 1);
        assert_eq!(json["disasters"][0]["agrn"], "AGRN-045");
        assert_eq!(json["disasters"][0]["has_end_date"], false);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let trail = AuditTrail::new("disasterassist", at(9, 0, 0));
        let missing = std::env::temp_dir().join("disaster-audit-missing/nested/dir");
        assert!(trail.write(&missing, at(9, 0, 1)).is_err());
    }
}
