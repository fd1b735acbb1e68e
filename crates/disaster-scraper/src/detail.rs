//! Extraction of a [`DisasterRecord`] from one detail page.
//!
//! Extraction is total: missing or malformed markup degrades individual
//! fields to `None` or empty, never the whole record.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use disaster_core::{
    normalize_agrn, AgdrpPayment, AreaFilter, AssistanceDetails, DisasterRecord,
};
use scraper::{ElementRef, Html, Selector};
use sha2::{Digest, Sha256};

use crate::client::FetchedPage;
use crate::listing::{element_text, ListingContext};
use crate::normalize::{map_disaster_type, map_state_code, parse_listing_date};

const AGDRP_MARKER: &str = "$1000";
const HOTLINE: &str = "180 22 66";
const AGDRP_ADULT: u32 = 1000;
const AGDRP_CHILD: u32 = 400;
const DESCRIPTION_PARAGRAPHS: usize = 3;

/// Builds a record from a fetched detail page and the listing row that led
/// to it.
#[must_use]
pub fn extract_disaster(
    page: &FetchedPage,
    context: &ListingContext,
    filter: &AreaFilter,
) -> DisasterRecord {
    let document = Html::parse_document(&page.body);

    let paragraphs = direct_texts(&document, "p");
    let event_name = context
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .or_else(|| first_text(&document, "h1"));

    DisasterRecord {
        agrn_reference: normalize_agrn(&context.agrn),
        event_name,
        disaster_type: map_disaster_type(context.disaster_type.as_deref()),
        state_code: Some(map_state_code(context.state.as_deref())),
        declaration_date: parse_listing_date(context.start_date.as_deref()),
        expiry_date: parse_listing_date(context.end_date.as_deref()),
        affected_areas: extract_areas(&document, filter),
        assistance_details: extract_assistance(&paragraphs),
        quick_info: extract_quick_info(&document),
        page_title: first_text(&document, "title"),
        description: (!paragraphs.is_empty()).then(|| {
            paragraphs
                .iter()
                .take(DESCRIPTION_PARAGRAPHS)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join("\n\n")
        }),
        source_url: page.url.clone(),
        scraped_at: Utc::now(),
        content_checksum: content_checksum(&page.body),
    }
}

/// SHA-256 hex digest of the raw page body.
#[must_use]
pub fn content_checksum(body: &str) -> String {
    format!("{:x}", Sha256::digest(body.as_bytes()))
}

/// Candidate area names are the direct text of list items, anywhere in the
/// page and in the `.content-area` region.
fn extract_areas(document: &Html, filter: &AreaFilter) -> BTreeSet<String> {
    ["ul li", ".content-area li"]
        .into_iter()
        .flat_map(|selector| direct_texts(document, selector))
        .filter(|text| filter.accepts(text))
        .collect()
}

fn extract_assistance(paragraphs: &[String]) -> AssistanceDetails {
    let mut details = AssistanceDetails::default();
    for para in paragraphs {
        if para.contains(AGDRP_MARKER) && para.to_lowercase().contains("adult") {
            details.agdrp_payment = Some(AgdrpPayment {
                adult: AGDRP_ADULT,
                child: AGDRP_CHILD,
            });
        }
        if para.contains(HOTLINE) {
            details.hotline = Some(HOTLINE.to_owned());
        }
    }
    details
}

/// Pairs each `<dt>` with the `<dd>` at the same position.
fn extract_quick_info(document: &Html) -> BTreeMap<String, String> {
    let terms = element_texts(document, "dt");
    let descriptions = element_texts(document, "dd");
    terms
        .into_iter()
        .zip(descriptions)
        .filter(|(term, _)| !term.is_empty())
        .collect()
}

/// Trimmed, non-empty text nodes that are direct children of each match.
/// Text nested inside links or other markup is skipped, which keeps
/// navigation menus (`<li><a>Home</a></li>`) out of the candidates.
fn direct_texts(document: &Html, selector: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };
    document
        .select(&selector)
        .flat_map(|el| {
            el.children()
                .filter_map(|node| node.value().as_text().map(|t| t.trim().to_owned()))
                .collect::<Vec<_>>()
        })
        .filter(|text| !text.is_empty())
        .collect()
}

fn element_texts(document: &Html, selector: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };
    document.select(&selector).map(element_text).collect()
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .map(|el: ElementRef<'_>| element_text(el))
        .find(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use disaster_core::{DisasterType, StateCode};

    use super::*;

    const DETAIL_HTML: &str = r#"<html>
<head><title>Flood Event - DisasterAssist</title></head>
<body>
  <nav><ul><li><a href="/">Home</a></li><li><a href="/contact">Contact</a></li></ul></nav>
  <h1>Queensland Flood Event</h1>
  <div class="content-area">
    <p>Disaster assistance is available for the following areas.</p>
    <p>The AGDRP is $1000 per eligible adult and $400 per eligible child.</p>
    <p>Call the Australian Government Emergency Information Line on 180 22 66.</p>
    <p>Further details will be published as they become available.</p>
    <ul>
      <li>Brisbane</li>
      <li>Home</li>
      <li>Logan</li>
      <li>Brisbane</li>
      <li>Queensland Reconstruction Authority</li>
      <li>https://www.qra.qld.gov.au</li>
    </ul>
    <dl>
      <dt>Start date</dt><dd>January 2025</dd>
      <dt>Category</dt><dd>Category A</dd>
      <dt>Orphan term</dt>
    </dl>
  </div>
</body></html>"#;

    fn page(body: &str) -> FetchedPage {
        FetchedPage {
            url: "https://www.disasterassist.gov.au/find-a-disaster/agrn-1045".to_owned(),
            body: body.to_owned(),
        }
    }

    fn context() -> ListingContext {
        ListingContext {
            start_date: Some("Jan 2025".to_owned()),
            end_date: Some("- -".to_owned()),
            state: Some("Queensland".to_owned()),
            disaster_type: Some("Flood".to_owned()),
            name: Some("Flood Event".to_owned()),
            agrn: "1,045".to_owned(),
        }
    }

    #[test]
    fn extracts_identity_from_listing_context() {
        let record = extract_disaster(&page(DETAIL_HTML), &context(), &AreaFilter::default());
        assert_eq!(record.agrn_reference, "AGRN-1045");
        assert_eq!(record.event_name.as_deref(), Some("Flood Event"));
        assert_eq!(record.disaster_type, DisasterType::Flood);
        assert_eq!(record.state_code, Some(StateCode::Qld));
        assert_eq!(record.declaration_date, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(record.expiry_date, None);
        assert!(record.is_active());
    }

    #[test]
    fn filters_and_deduplicates_areas() {
        let record = extract_disaster(&page(DETAIL_HTML), &context(), &AreaFilter::default());
        let areas: Vec<&str> = record.affected_areas.iter().map(String::as_str).collect();
        assert_eq!(areas, vec!["Brisbane", "Logan"]);
        assert_eq!(record.area_count(), 2);
    }

    #[test]
    fn extracts_assistance_markers() {
        let record = extract_disaster(&page(DETAIL_HTML), &context(), &AreaFilter::default());
        assert_eq!(
            record.assistance_details.agdrp_payment,
            Some(AgdrpPayment {
                adult: 1000,
                child: 400
            })
        );
        assert_eq!(
            record.assistance_details.hotline.as_deref(),
            Some("180 22 66")
        );
    }

    #[test]
    fn pairs_definition_terms_by_position() {
        let record = extract_disaster(&page(DETAIL_HTML), &context(), &AreaFilter::default());
        assert_eq!(record.quick_info.len(), 2);
        assert_eq!(
            record.quick_info.get("Start date").map(String::as_str),
            Some("January 2025")
        );
        assert_eq!(
            record.quick_info.get("Category").map(String::as_str),
            Some("Category A")
        );
    }

    #[test]
    fn captures_title_description_and_checksum() {
        let record = extract_disaster(&page(DETAIL_HTML), &context(), &AreaFilter::default());
        assert_eq!(
            record.page_title.as_deref(),
            Some("Flood Event - DisasterAssist")
        );
        let description = record.description.unwrap();
        assert_eq!(description.split("\n\n").count(), 3);
        assert!(description.starts_with("Disaster assistance is available"));
        assert_eq!(record.content_checksum, content_checksum(DETAIL_HTML));
        assert_eq!(record.content_checksum.len(), 64);
        assert_eq!(
            record.source_url,
            "https://www.disasterassist.gov.au/find-a-disaster/agrn-1045"
        );
    }

    #[test]
    fn falls_back_to_h1_when_listing_name_missing() {
        let mut ctx = context();
        ctx.name = None;
        let record = extract_disaster(&page(DETAIL_HTML), &ctx, &AreaFilter::default());
        assert_eq!(record.event_name.as_deref(), Some("Queensland Flood Event"));
    }

    #[test]
    fn empty_page_degrades_to_defaults() {
        let ctx = ListingContext {
            agrn: "77".to_owned(),
            ..ListingContext::default()
        };
        let record = extract_disaster(&page(""), &ctx, &AreaFilter::default());
        assert_eq!(record.agrn_reference, "AGRN-77");
        assert_eq!(record.event_name, None);
        assert_eq!(record.disaster_type, DisasterType::Other);
        assert_eq!(record.state_code, Some(StateCode::Nsw));
        assert!(record.affected_areas.is_empty());
        assert!(record.assistance_details.is_empty());
        assert!(record.quick_info.is_empty());
        assert_eq!(record.description, None);
        assert_eq!(record.page_title, None);
    }

    #[test]
    fn checksum_changes_with_content() {
        assert_ne!(content_checksum("<p>a</p>"), content_checksum("<p>b</p>"));
    }
}
