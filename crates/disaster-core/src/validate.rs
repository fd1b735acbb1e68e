//! Pre-persistence validation of extracted records.

use thiserror::Error;

use crate::agrn::AGRN_PREFIX;
use crate::record::{DisasterRecord, StateCode};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid AGRN format: {0}")]
    InvalidAgrn(String),
}

/// A record that passed [`validate_record`]. Required fields are exposed
/// without `Option`; the underlying record is unchanged.
#[derive(Debug, Clone)]
pub struct ValidatedRecord {
    record: DisasterRecord,
    state_code: StateCode,
}

impl ValidatedRecord {
    #[must_use]
    pub fn record(&self) -> &DisasterRecord {
        &self.record
    }

    #[must_use]
    pub fn agrn_reference(&self) -> &str {
        &self.record.agrn_reference
    }

    #[must_use]
    pub fn event_name(&self) -> &str {
        self.record.event_name.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn state_code(&self) -> StateCode {
        self.state_code
    }

    #[must_use]
    pub fn into_record(self) -> DisasterRecord {
        self.record
    }
}

/// Checks that `agrn_reference`, `event_name`, and `state_code` are present
/// and that the AGRN carries its canonical prefix.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] for a blank or absent required
/// field, or [`ValidationError::InvalidAgrn`] when the prefix is missing.
pub fn validate_record(record: DisasterRecord) -> Result<ValidatedRecord, ValidationError> {
    if record.agrn_reference.trim().is_empty() {
        return Err(ValidationError::MissingField("agrn_reference"));
    }
    if record
        .event_name
        .as_deref()
        .is_none_or(|name| name.trim().is_empty())
    {
        return Err(ValidationError::MissingField("event_name"));
    }
    let Some(state_code) = record.state_code else {
        return Err(ValidationError::MissingField("state_code"));
    };
    if !record.agrn_reference.starts_with(AGRN_PREFIX) {
        return Err(ValidationError::InvalidAgrn(record.agrn_reference));
    }

    Ok(ValidatedRecord { record, state_code })
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use chrono::Utc;

    use super::*;
    use crate::record::{AssistanceDetails, DisasterType};

    fn make_record() -> DisasterRecord {
        DisasterRecord {
            agrn_reference: "AGRN-1023".to_string(),
            event_name: Some("Severe Weather Event".to_string()),
            disaster_type: DisasterType::SevereStorm,
            state_code: Some(StateCode::Nsw),
            declaration_date: None,
            expiry_date: None,
            affected_areas: BTreeSet::new(),
            assistance_details: AssistanceDetails::default(),
            quick_info: BTreeMap::new(),
            page_title: None,
            description: None,
            source_url: "https://www.disasterassist.gov.au/x".to_string(),
            scraped_at: Utc::now(),
            content_checksum: "abc".to_string(),
        }
    }

    #[test]
    fn complete_record_passes() {
        let validated = validate_record(make_record()).unwrap();
        assert_eq!(validated.agrn_reference(), "AGRN-1023");
        assert_eq!(validated.event_name(), "Severe Weather Event");
        assert_eq!(validated.state_code(), StateCode::Nsw);
    }

    #[test]
    fn missing_state_code_is_rejected() {
        let mut record = make_record();
        record.state_code = None;
        assert_eq!(
            validate_record(record).unwrap_err(),
            ValidationError::MissingField("state_code")
        );
    }

    #[test]
    fn missing_event_name_is_rejected() {
        let mut record = make_record();
        record.event_name = None;
        assert_eq!(
            validate_record(record).unwrap_err(),
            ValidationError::MissingField("event_name")
        );
    }

    #[test]
    fn blank_event_name_is_rejected() {
        let mut record = make_record();
        record.event_name = Some("   ".to_string());
        assert!(matches!(
            validate_record(record),
            Err(ValidationError::MissingField("event_name"))
        ));
    }

    #[test]
    fn empty_agrn_is_rejected() {
        let mut record = make_record();
        record.agrn_reference = String::new();
        assert_eq!(
            validate_record(record).unwrap_err(),
            ValidationError::MissingField("agrn_reference")
        );
    }

    #[test]
    fn unprefixed_agrn_is_rejected() {
        let mut record = make_record();
        record.agrn_reference = "123".to_string();
        assert_eq!(
            validate_record(record).unwrap_err(),
            ValidationError::InvalidAgrn("123".to_string())
        );
    }

    #[test]
    fn validation_does_not_touch_optional_fields() {
        let mut record = make_record();
        record.affected_areas.insert("Sydney".to_string());
        let validated = validate_record(record.clone()).unwrap();
        assert_eq!(validated.into_record(), record);
    }
}
