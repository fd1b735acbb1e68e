//! Heuristic filter separating LGA names from the navigation labels, agency
//! names and boilerplate that share the same `<li>` elements on detail pages.
//!
//! The built-in tables reflect the DisasterAssist layout. When the site
//! changes, point `DISASTER_AREA_FILTER_PATH` at a YAML file with the same
//! shape instead of editing code:
//!
//! ```yaml
//! min_len: 3
//! max_len: 50
//! excluded_phrases: ["Home", "Contact"]
//! blacklist_keywords: ["assistance"]
//! url_markers: ["http", "www", "@"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const DEFAULT_EXCLUDED_PHRASES: &[&str] = &[
    "Home",
    "Contact",
    "About",
    "Help",
    "Search",
    "Menu",
    "Services Australia",
    "Skip to",
    "PORTFOLIO",
    "BORDER",
    "Find a disaster",
    "Getting help",
    "How to help",
    "Disaster arrangements",
    "Key contacts",
    "Web privacy",
    "Accessibility",
    "Freedom of information",
    "Copyright",
    "Privacy",
    "Lost or damaged",
    "National Emergency",
    "Disaster Recovery Funding",
    "Bushfire",
    "Storm",
    "Flood",
    "Cyclone",
    "Drought",
    "Information publication scheme",
    "Queensland Reconstruction Authority",
    "NSW Rural Assistance Authority",
    "NSW Reconstruction Authority",
    "Emergency assistance grants",
    "TasRecovery",
    "VicEmergency",
    "Emergency Recovery Victoria",
    "Service NSW",
    "Recovering from emergencies",
    "Personal hardship",
    "Personal and financial counselling",
    "Removal of debris",
    "Counter disaster operations",
    "Restoration of essential public assets",
    "Freight subsides",
    "Government of South Australia",
    "Western Australia Department",
    "Department of Foreign Affairs",
];

const DEFAULT_BLACKLIST_KEYWORDS: &[&str] = &[
    "assistance",
    "recovery",
    "authority",
    "department",
    "government",
    "scheme",
    "grants",
    "operations",
    "counselling",
    "restoration",
];

const DEFAULT_URL_MARKERS: &[&str] = &["http", "www", "@"];

const DEFAULT_MIN_LEN: usize = 3;
const DEFAULT_MAX_LEN: usize = 50;

fn default_min_len() -> usize {
    DEFAULT_MIN_LEN
}

fn default_max_len() -> usize {
    DEFAULT_MAX_LEN
}

fn default_url_markers() -> Vec<String> {
    DEFAULT_URL_MARKERS.iter().map(|s| (*s).to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaFilter {
    /// Inclusive length bounds, counted in characters.
    #[serde(default = "default_min_len")]
    pub min_len: usize,
    #[serde(default = "default_max_len")]
    pub max_len: usize,
    /// Matched case-insensitively as substrings.
    pub excluded_phrases: Vec<String>,
    /// Matched case-insensitively as substrings.
    pub blacklist_keywords: Vec<String>,
    /// Matched case-sensitively as substrings.
    #[serde(default = "default_url_markers")]
    pub url_markers: Vec<String>,
    #[serde(skip)]
    excluded_lower: Vec<String>,
    #[serde(skip)]
    keywords_lower: Vec<String>,
}

impl Default for AreaFilter {
    fn default() -> Self {
        Self::new(
            DEFAULT_MIN_LEN,
            DEFAULT_MAX_LEN,
            DEFAULT_EXCLUDED_PHRASES.iter().map(|s| (*s).to_string()).collect(),
            DEFAULT_BLACKLIST_KEYWORDS.iter().map(|s| (*s).to_string()).collect(),
            default_url_markers(),
        )
    }
}

impl AreaFilter {
    #[must_use]
    pub fn new(
        min_len: usize,
        max_len: usize,
        excluded_phrases: Vec<String>,
        blacklist_keywords: Vec<String>,
        url_markers: Vec<String>,
    ) -> Self {
        let mut filter = Self {
            min_len,
            max_len,
            excluded_phrases,
            blacklist_keywords,
            url_markers,
            excluded_lower: Vec::new(),
            keywords_lower: Vec::new(),
        };
        filter.rebuild_lowercase();
        filter
    }

    fn rebuild_lowercase(&mut self) {
        self.excluded_lower = self
            .excluded_phrases
            .iter()
            .map(|p| p.to_lowercase())
            .collect();
        self.keywords_lower = self
            .blacklist_keywords
            .iter()
            .map(|k| k.to_lowercase())
            .collect();
    }

    /// Returns `true` if `text` looks like a local-government-area name.
    ///
    /// `text` is expected to be trimmed already.
    #[must_use]
    pub fn accepts(&self, text: &str) -> bool {
        let len = text.chars().count();
        if len < self.min_len || len > self.max_len {
            return false;
        }

        let lower = text.to_lowercase();
        if self.excluded_lower.iter().any(|p| lower.contains(p.as_str())) {
            return false;
        }
        if self.keywords_lower.iter().any(|k| lower.contains(k.as_str())) {
            return false;
        }

        if !text.chars().next().is_some_and(char::is_uppercase) {
            return false;
        }

        !self.url_markers.iter().any(|m| text.contains(m.as_str()))
    }
}

/// Parse an area filter from YAML text.
///
/// # Errors
///
/// Returns [`ConfigError::AreaFilterParse`] for malformed YAML, or
/// [`ConfigError::Validation`] if the length bounds are inverted or zero.
pub fn parse_area_filter(yaml: &str) -> Result<AreaFilter, ConfigError> {
    let mut filter: AreaFilter = serde_yaml::from_str(yaml)?;
    if filter.min_len == 0 || filter.min_len > filter.max_len {
        return Err(ConfigError::Validation(format!(
            "area filter length bounds are invalid: min_len={} max_len={}",
            filter.min_len, filter.max_len
        )));
    }
    filter.rebuild_lowercase();
    Ok(filter)
}

/// Load an area filter from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_area_filter(path: &Path) -> Result<AreaFilter, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::AreaFilterIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_area_filter(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_capitalized_name() {
        let filter = AreaFilter::default();
        assert!(filter.accepts("Sydney"));
        assert!(filter.accepts("Moreton Bay"));
        assert!(filter.accepts("Brisbane"));
    }

    #[test]
    fn rejects_navigation_labels() {
        let filter = AreaFilter::default();
        assert!(!filter.accepts("Home"));
        assert!(!filter.accepts("Contact us"));
        assert!(!filter.accepts("Skip to main content"));
    }

    #[test]
    fn rejects_agency_names() {
        let filter = AreaFilter::default();
        assert!(!filter.accepts("NSW Reconstruction Authority"));
        assert!(!filter.accepts("Queensland Reconstruction Authority"));
    }

    #[test]
    fn exclusion_is_case_insensitive() {
        let filter = AreaFilter::default();
        assert!(!filter.accepts("HOME"));
        assert!(!filter.accepts("Flood Recovery Centre"));
    }

    #[test]
    fn rejects_blacklisted_keywords() {
        let filter = AreaFilter::default();
        assert!(!filter.accepts("Local Government Area"));
        assert!(!filter.accepts("Disaster Assistance Hub"));
    }

    #[test]
    fn rejects_url_like_text() {
        let filter = AreaFilter::default();
        assert!(!filter.accepts("See https://example.com"));
        assert!(!filter.accepts("Visit www.qld.gov.au"));
        assert!(!filter.accepts("Email info@nsw.gov.au"));
    }

    #[test]
    fn rejects_lowercase_start() {
        let filter = AreaFilter::default();
        assert!(!filter.accepts("sydney"));
    }

    #[test]
    fn enforces_length_bounds() {
        let filter = AreaFilter::default();
        assert!(!filter.accepts("Ab"));
        assert!(filter.accepts("Ayr"));
        assert!(!filter.accepts(&"A".repeat(51)));
        assert!(filter.accepts(&format!("A{}", "b".repeat(49))));
    }

    #[test]
    fn parse_area_filter_applies_defaults() {
        let yaml = "excluded_phrases: [\"Home\"]\nblacklist_keywords: [\"council\"]\n";
        let filter = parse_area_filter(yaml).unwrap();
        assert_eq!(filter.min_len, 3);
        assert_eq!(filter.max_len, 50);
        assert!(!filter.accepts("home page"));
        assert!(!filter.accepts("Cairns Regional Council"));
        assert!(filter.accepts("Cairns"));
        assert!(!filter.accepts("http://cairns"));
    }

    #[test]
    fn parse_area_filter_rejects_inverted_bounds() {
        let yaml = "min_len: 10\nmax_len: 5\nexcluded_phrases: []\nblacklist_keywords: []\n";
        assert!(matches!(
            parse_area_filter(yaml),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn parse_area_filter_rejects_malformed_yaml() {
        assert!(matches!(
            parse_area_filter("excluded_phrases: [unterminated"),
            Err(ConfigError::AreaFilterParse(_))
        ));
    }

    #[test]
    fn load_area_filter_reports_missing_file() {
        let err = load_area_filter(Path::new("/nonexistent/area_filter.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::AreaFilterIo { .. }));
    }
}
