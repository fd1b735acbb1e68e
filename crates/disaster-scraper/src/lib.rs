pub mod client;
pub mod crawler;
pub mod detail;
pub mod error;
pub mod listing;
pub mod normalize;
mod rate_limit;

pub use client::{listing_page_url, DisasterClient, FetchedPage};
pub use crawler::{
    CrawlCoordinator, CrawlMode, CrawlRequest, CrawlStats, RecordSink, MAX_LISTING_PAGES,
};
pub use detail::extract_disaster;
pub use error::ScraperError;
pub use listing::{parse_listing, ListingContext, ListingRow};
pub use normalize::{map_disaster_type, map_state_code, parse_listing_date};
