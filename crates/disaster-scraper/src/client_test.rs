use super::*;

const SEED: &str = "https://www.disasterassist.gov.au/find-a-disaster/australian-disasters";

#[test]
fn listing_page_zero_is_the_seed() {
    assert_eq!(listing_page_url(SEED, 0).unwrap(), SEED);
}

#[test]
fn listing_page_appends_page_param() {
    assert_eq!(
        listing_page_url(SEED, 1).unwrap(),
        format!("{SEED}?page=1")
    );
    assert_eq!(
        listing_page_url(SEED, 49).unwrap(),
        format!("{SEED}?page=49")
    );
}

#[test]
fn listing_page_replaces_existing_page_param() {
    let seed = "https://example.com/list?sort=date&page=7";
    assert_eq!(
        listing_page_url(seed, 3).unwrap(),
        "https://example.com/list?sort=date&page=3"
    );
}

#[test]
fn listing_page_rejects_invalid_seed() {
    let err = listing_page_url("not-a-url", 2).unwrap_err();
    assert!(
        matches!(err, ScraperError::InvalidUrl { .. }),
        "expected InvalidUrl, got: {err:?}"
    );
}

#[test]
fn resolve_link_handles_relative_paths() {
    assert_eq!(
        resolve_link(SEED, "/find-a-disaster/australian-disasters/agrn-1023").unwrap(),
        "https://www.disasterassist.gov.au/find-a-disaster/australian-disasters/agrn-1023"
    );
}

#[test]
fn resolve_link_keeps_absolute_urls() {
    assert_eq!(
        resolve_link(SEED, "https://other.example.com/page").unwrap(),
        "https://other.example.com/page"
    );
}

#[test]
fn resolve_link_rejects_invalid_base() {
    assert!(matches!(
        resolve_link("relative/base", "/x"),
        Err(ScraperError::InvalidUrl { .. })
    ));
}

#[test]
fn client_builds_with_defaults() {
    assert!(DisasterClient::new(30, "disaster-test/0.1", 5, 1000).is_ok());
}
