use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Disaster category, derived from the listing's free-text type column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisasterType {
    Flood,
    Bushfire,
    Cyclone,
    SevereStorm,
    Earthquake,
    Drought,
    #[default]
    Other,
}

impl DisasterType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DisasterType::Flood => "flood",
            DisasterType::Bushfire => "bushfire",
            DisasterType::Cyclone => "cyclone",
            DisasterType::SevereStorm => "severe_storm",
            DisasterType::Earthquake => "earthquake",
            DisasterType::Drought => "drought",
            DisasterType::Other => "other",
        }
    }
}

impl std::fmt::Display for DisasterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Australian state or territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StateCode {
    #[default]
    Nsw,
    Vic,
    Qld,
    Sa,
    Wa,
    Tas,
    Nt,
    Act,
}

impl StateCode {
    pub const ALL: [StateCode; 8] = [
        StateCode::Nsw,
        StateCode::Vic,
        StateCode::Qld,
        StateCode::Sa,
        StateCode::Wa,
        StateCode::Tas,
        StateCode::Nt,
        StateCode::Act,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StateCode::Nsw => "NSW",
            StateCode::Vic => "VIC",
            StateCode::Qld => "QLD",
            StateCode::Sa => "SA",
            StateCode::Wa => "WA",
            StateCode::Tas => "TAS",
            StateCode::Nt => "NT",
            StateCode::Act => "ACT",
        }
    }

    #[must_use]
    pub fn full_name(self) -> &'static str {
        match self {
            StateCode::Nsw => "New South Wales",
            StateCode::Vic => "Victoria",
            StateCode::Qld => "Queensland",
            StateCode::Sa => "South Australia",
            StateCode::Wa => "Western Australia",
            StateCode::Tas => "Tasmania",
            StateCode::Nt => "Northern Territory",
            StateCode::Act => "Australian Capital Territory",
        }
    }

    /// LGA code of the state capital, used when a declaration's areas cannot
    /// be resolved against the registry.
    #[must_use]
    pub fn capital_lga_code(self) -> &'static str {
        match self {
            StateCode::Nsw => "17200",
            StateCode::Vic => "24600",
            StateCode::Qld => "31000",
            StateCode::Sa => "40070",
            StateCode::Wa => "57080",
            StateCode::Tas => "62810",
            StateCode::Nt => "71000",
            StateCode::Act => "89000",
        }
    }
}

impl std::fmt::Display for StateCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Australian Government Disaster Recovery Payment amounts, in whole dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgdrpPayment {
    pub adult: u32,
    pub child: u32,
}

/// Assistance markers found in a detail page's paragraphs. Both fields are
/// omitted from JSON when absent, so an empty value serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistanceDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agdrp_payment: Option<AgdrpPayment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotline: Option<String>,
}

impl AssistanceDetails {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agdrp_payment.is_none() && self.hotline.is_none()
    }
}

/// One disaster declaration as extracted from a DisasterAssist detail page.
///
/// `event_name` and `state_code` are optional so that incomplete extractions
/// are representable; [`crate::validate_record`] rejects them before
/// persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisasterRecord {
    /// Canonical `AGRN-<digits>` key.
    pub agrn_reference: String,
    pub event_name: Option<String>,
    pub disaster_type: DisasterType,
    pub state_code: Option<StateCode>,
    pub declaration_date: Option<NaiveDate>,
    /// `None` means the declaration is still active.
    pub expiry_date: Option<NaiveDate>,
    pub affected_areas: BTreeSet<String>,
    pub assistance_details: AssistanceDetails,
    pub quick_info: BTreeMap<String, String>,
    pub page_title: Option<String>,
    /// First three paragraphs of the detail page, blank-line separated.
    pub description: Option<String>,
    pub source_url: String,
    pub scraped_at: DateTime<Utc>,
    /// SHA-256 hex digest of the raw detail-page body.
    pub content_checksum: String,
}

impl DisasterRecord {
    #[must_use]
    pub fn area_count(&self) -> usize {
        self.affected_areas.len()
    }

    /// Returns `true` while no expiry date has been published.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.expiry_date.is_none()
    }
}
