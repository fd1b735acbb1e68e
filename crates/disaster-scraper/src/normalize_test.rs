use super::*;

// -----------------------------------------------------------------------
// map_disaster_type
// -----------------------------------------------------------------------

#[test]
fn disaster_type_matches_keywords() {
    assert_eq!(map_disaster_type(Some("Flood")), DisasterType::Flood);
    assert_eq!(map_disaster_type(Some("Bushfire")), DisasterType::Bushfire);
    assert_eq!(map_disaster_type(Some("Grass fire")), DisasterType::Bushfire);
    assert_eq!(
        map_disaster_type(Some("Tropical Cyclone Alfred")),
        DisasterType::Cyclone
    );
    assert_eq!(
        map_disaster_type(Some("Severe Storm")),
        DisasterType::SevereStorm
    );
    assert_eq!(
        map_disaster_type(Some("Earthquake")),
        DisasterType::Earthquake
    );
    assert_eq!(map_disaster_type(Some("Drought")), DisasterType::Drought);
}

#[test]
fn disaster_type_is_case_insensitive() {
    assert_eq!(map_disaster_type(Some("FLOODING")), DisasterType::Flood);
}

#[test]
fn disaster_type_prefers_flood_over_storm() {
    assert_eq!(
        map_disaster_type(Some("Storm and Flood")),
        DisasterType::Flood
    );
}

#[test]
fn disaster_type_defaults_to_other() {
    assert_eq!(map_disaster_type(None), DisasterType::Other);
    assert_eq!(map_disaster_type(Some("")), DisasterType::Other);
    assert_eq!(map_disaster_type(Some("Landslide")), DisasterType::Other);
}

// -----------------------------------------------------------------------
// map_state_code
// -----------------------------------------------------------------------

#[test]
fn state_code_maps_full_names() {
    assert_eq!(map_state_code(Some("Queensland")), StateCode::Qld);
    assert_eq!(map_state_code(Some("South Australia")), StateCode::Sa);
    assert_eq!(
        map_state_code(Some("Australian Capital Territory")),
        StateCode::Act
    );
    assert_eq!(map_state_code(Some("Northern Territory")), StateCode::Nt);
}

#[test]
fn state_code_maps_abbreviations() {
    assert_eq!(map_state_code(Some("VIC")), StateCode::Vic);
    assert_eq!(map_state_code(Some("WA")), StateCode::Wa);
    assert_eq!(map_state_code(Some("TAS")), StateCode::Tas);
}

#[test]
fn state_code_falls_back_to_nsw() {
    assert_eq!(map_state_code(None), StateCode::Nsw);
    assert_eq!(map_state_code(Some("Queensland, NSW")), StateCode::Nsw);
    assert_eq!(map_state_code(Some("qld")), StateCode::Nsw);
}

// -----------------------------------------------------------------------
// parse_listing_date
// -----------------------------------------------------------------------

#[test]
fn date_month_year_abbreviated_is_first_of_month() {
    assert_eq!(
        parse_listing_date(Some("Mar 2025")),
        NaiveDate::from_ymd_opt(2025, 3, 1)
    );
}

#[test]
fn date_month_year_full_name() {
    assert_eq!(
        parse_listing_date(Some("March 2025")),
        NaiveDate::from_ymd_opt(2025, 3, 1)
    );
}

#[test]
fn date_day_month_year() {
    assert_eq!(
        parse_listing_date(Some("07 Mar 2025")),
        NaiveDate::from_ymd_opt(2025, 3, 7)
    );
    assert_eq!(
        parse_listing_date(Some("21 February 2022")),
        NaiveDate::from_ymd_opt(2022, 2, 21)
    );
}

#[test]
fn date_is_trimmed() {
    assert_eq!(
        parse_listing_date(Some("  Jan 2024 ")),
        NaiveDate::from_ymd_opt(2024, 1, 1)
    );
}

#[test]
fn date_placeholders_are_absent() {
    assert_eq!(parse_listing_date(Some("- -")), None);
    assert_eq!(parse_listing_date(Some("")), None);
    assert_eq!(parse_listing_date(Some("N/A")), None);
    assert_eq!(parse_listing_date(None), None);
}

#[test]
fn date_unparseable_is_absent() {
    assert_eq!(parse_listing_date(Some("2025-03-01")), None);
    assert_eq!(parse_listing_date(Some("sometime soon")), None);
}
