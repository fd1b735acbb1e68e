//! Normalization of the listing's free-text columns into typed values.
//!
//! Every function here is total: unrecognized input maps to a documented
//! default (or `None`) instead of an error.

use chrono::NaiveDate;
use disaster_core::{DisasterType, StateCode};

/// Date layouts seen in the listing, tried in order. Month-only layouts
/// resolve to the first of the month.
const DATE_FORMATS: [(&str, bool); 4] = [
    ("%b %Y", false),
    ("%B %Y", false),
    ("%d %b %Y", true),
    ("%d %B %Y", true),
];

/// Maps the listing's type column to a [`DisasterType`] by keyword.
///
/// Keywords are checked in priority order, so `"Flood and Storm"` is a flood.
#[must_use]
pub fn map_disaster_type(raw: Option<&str>) -> DisasterType {
    let Some(raw) = raw else {
        return DisasterType::Other;
    };
    let lower = raw.to_lowercase();

    if lower.contains("flood") {
        DisasterType::Flood
    } else if lower.contains("fire") {
        DisasterType::Bushfire
    } else if lower.contains("cyclone") {
        DisasterType::Cyclone
    } else if lower.contains("storm") {
        DisasterType::SevereStorm
    } else if lower.contains("earthquake") {
        DisasterType::Earthquake
    } else if lower.contains("drought") {
        DisasterType::Drought
    } else {
        DisasterType::Other
    }
}

/// Maps a state name or abbreviation (`"Queensland"`, `"QLD"`) to a
/// [`StateCode`]. Anything unrecognized falls back to NSW.
#[must_use]
pub fn map_state_code(raw: Option<&str>) -> StateCode {
    let Some(raw) = raw.map(str::trim) else {
        return StateCode::default();
    };

    StateCode::ALL
        .into_iter()
        .find(|state| raw == state.as_str() || raw == state.full_name())
        .unwrap_or_default()
}

/// Parses a listing date cell.
///
/// Returns `None` for empty cells, the site's `N/A` and `- -` placeholders,
/// and anything that matches none of the known layouts.
#[must_use]
pub fn parse_listing_date(raw: Option<&str>) -> Option<NaiveDate> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() || trimmed == "N/A" || trimmed == "- -" {
        return None;
    }

    DATE_FORMATS.iter().find_map(|(fmt, has_day)| {
        if *has_day {
            NaiveDate::parse_from_str(trimmed, fmt).ok()
        } else {
            NaiveDate::parse_from_str(&format!("1 {trimmed}"), &format!("%d {fmt}")).ok()
        }
    })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
