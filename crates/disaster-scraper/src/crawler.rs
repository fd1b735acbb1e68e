//! Single-worker crawl over the listing and its detail pages.
//!
//! [`CrawlCoordinator`] owns the FIFO request queue, the run-scoped
//! de-duplication sets, and the listing page counter. Requests are executed
//! strictly one at a time with a politeness delay between them.

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use disaster_core::{AreaFilter, DisasterRecord};

use crate::client::{listing_page_url, resolve_link, DisasterClient, FetchedPage};
use crate::detail::extract_disaster;
use crate::listing::{parse_listing, ListingContext};

/// Hard ceiling on listing pages fetched per run.
pub const MAX_LISTING_PAGES: u32 = 50;

/// Whether disasters already known to have ended are re-fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrawlMode {
    /// Fetch every disaster in the listing.
    #[default]
    Full,
    /// Skip disasters whose AGRN is in the preloaded closed set.
    Rescrape,
}

impl CrawlMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Rescrape => "rescrape",
        }
    }
}

impl fmt::Display for CrawlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown crawl mode `{0}` (expected `full` or `rescrape`)")]
pub struct ParseCrawlModeError(String);

impl FromStr for CrawlMode {
    type Err = ParseCrawlModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "rescrape" => Ok(Self::Rescrape),
            _ => Err(ParseCrawlModeError(s.to_owned())),
        }
    }
}

/// One unit of work in the crawl queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlRequest {
    Listing { page_index: u32, url: String },
    Detail { url: String, context: ListingContext },
}

/// Counters reported at the end of a crawl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub listing_pages: u32,
    pub rows_seen: usize,
    pub rows_invalid: usize,
    pub duplicates_skipped: usize,
    pub closed_skipped: usize,
    pub details_enqueued: usize,
    pub records_emitted: usize,
    pub requests_failed: usize,
}

/// Receives each extracted record as soon as it is produced.
pub trait RecordSink {
    fn accept(&mut self, record: DisasterRecord) -> impl Future<Output = ()> + Send;
}

impl RecordSink for Vec<DisasterRecord> {
    fn accept(&mut self, record: DisasterRecord) -> impl Future<Output = ()> + Send {
        self.push(record);
        std::future::ready(())
    }
}

/// Drives one crawl run. Create a fresh coordinator per run.
#[derive(Debug)]
pub struct CrawlCoordinator {
    seed_url: String,
    mode: CrawlMode,
    area_filter: AreaFilter,
    seen_this_run: HashSet<String>,
    closed_elsewhere: HashSet<String>,
    pages_crawled: u32,
    queue: VecDeque<CrawlRequest>,
    stats: CrawlStats,
}

impl CrawlCoordinator {
    /// Creates a coordinator with the seed listing page already queued.
    ///
    /// `closed_elsewhere` is only consulted in [`CrawlMode::Rescrape`].
    #[must_use]
    pub fn new(
        seed_url: impl Into<String>,
        mode: CrawlMode,
        closed_elsewhere: HashSet<String>,
        area_filter: AreaFilter,
    ) -> Self {
        let seed_url = seed_url.into();
        let mut queue = VecDeque::new();
        queue.push_back(CrawlRequest::Listing {
            page_index: 0,
            url: seed_url.clone(),
        });
        Self {
            seed_url,
            mode,
            area_filter,
            seen_this_run: HashSet::new(),
            closed_elsewhere,
            pages_crawled: 0,
            queue,
            stats: CrawlStats::default(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> CrawlMode {
        self.mode
    }

    #[must_use]
    pub fn pages_crawled(&self) -> u32 {
        self.pages_crawled
    }

    #[must_use]
    pub fn stats(&self) -> CrawlStats {
        CrawlStats {
            listing_pages: self.pages_crawled,
            ..self.stats
        }
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn next_request(&mut self) -> Option<CrawlRequest> {
        self.queue.pop_front()
    }

    /// Processes a fetched listing page.
    ///
    /// Enqueues one detail request per new valid row, then the next listing
    /// page unless the page had no data rows or the ceiling has been reached.
    /// Returns the number of detail requests enqueued.
    pub fn handle_listing(&mut self, page: &FetchedPage) -> usize {
        self.pages_crawled += 1;
        let page_index = self.pages_crawled - 1;
        let rows = parse_listing(&page.body);

        if rows.is_empty() {
            tracing::info!(
                page = page_index,
                url = %page.url,
                "listing page has no data rows; pagination complete"
            );
            return 0;
        }

        let mut enqueued = 0;
        for row in rows {
            self.stats.rows_seen += 1;
            if !row.is_valid() {
                self.stats.rows_invalid += 1;
                tracing::info!(
                    page = page_index,
                    cells = ?row.cells,
                    "skipping invalid listing row"
                );
                continue;
            }
            let (Some(key), Some(context), Some(href)) =
                (row.agrn_key(), row.context(), row.detail_link.as_deref())
            else {
                self.stats.rows_invalid += 1;
                continue;
            };

            if self.seen_this_run.contains(&key) {
                self.stats.duplicates_skipped += 1;
                tracing::debug!(agrn = %key, "already seen this run; skipping");
                continue;
            }
            if self.mode == CrawlMode::Rescrape && self.closed_elsewhere.contains(&key) {
                self.stats.closed_skipped += 1;
                tracing::debug!(agrn = %key, "disaster already closed; skipping");
                continue;
            }

            let url = match resolve_link(&page.url, href) {
                Ok(url) => url,
                Err(e) => {
                    self.stats.rows_invalid += 1;
                    tracing::warn!(agrn = %key, href, error = %e, "unresolvable detail link");
                    continue;
                }
            };

            self.seen_this_run.insert(key);
            self.queue.push_back(CrawlRequest::Detail { url, context });
            enqueued += 1;
        }
        self.stats.details_enqueued += enqueued;

        if self.pages_crawled >= MAX_LISTING_PAGES {
            tracing::info!(
                pages = self.pages_crawled,
                "listing page ceiling reached; pagination stopped"
            );
            return enqueued;
        }

        match listing_page_url(&self.seed_url, self.pages_crawled) {
            Ok(url) => self.queue.push_back(CrawlRequest::Listing {
                page_index: self.pages_crawled,
                url,
            }),
            Err(e) => {
                tracing::warn!(error = %e, "cannot build next listing URL; pagination stopped");
            }
        }
        enqueued
    }

    /// Records a listing fetch that failed after retries. The attempt
    /// counts against the ceiling and no further pages are queued.
    pub fn handle_listing_failure(&mut self) {
        self.pages_crawled += 1;
        self.stats.requests_failed += 1;
    }

    /// Extracts a record from a fetched detail page.
    #[must_use]
    pub fn handle_detail(&self, page: &FetchedPage, context: &ListingContext) -> DisasterRecord {
        extract_disaster(page, context, &self.area_filter)
    }

    /// Runs the crawl to completion, handing each record to `sink`.
    ///
    /// Fetch failures drop the affected request and never abort the run.
    pub async fn run<S: RecordSink>(
        mut self,
        client: &DisasterClient,
        delay: Duration,
        sink: &mut S,
    ) -> CrawlStats {
        tracing::info!(seed = %self.seed_url, mode = %self.mode, "crawl started");
        let mut first = true;

        while let Some(request) = self.next_request() {
            if !first && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            first = false;

            match request {
                CrawlRequest::Listing { page_index, url } => match client.fetch_page(&url).await {
                    Ok(page) => {
                        let enqueued = self.handle_listing(&page);
                        tracing::info!(
                            page = page_index,
                            details = enqueued,
                            "listing page processed"
                        );
                    }
                    Err(e) => {
                        self.handle_listing_failure();
                        tracing::error!(
                            page = page_index,
                            url = %url,
                            error = %e,
                            "listing fetch failed; pagination stopped"
                        );
                    }
                },
                CrawlRequest::Detail { url, context } => match client.fetch_page(&url).await {
                    Ok(page) => {
                        let record = self.handle_detail(&page, &context);
                        tracing::info!(
                            agrn = %record.agrn_reference,
                            areas = record.area_count(),
                            "disaster extracted"
                        );
                        self.stats.records_emitted += 1;
                        sink.accept(record).await;
                    }
                    Err(e) => {
                        self.stats.requests_failed += 1;
                        tracing::error!(
                            url = %url,
                            agrn = %context.agrn,
                            error = %e,
                            "detail fetch failed; request dropped"
                        );
                    }
                },
            }
        }

        let stats = self.stats();
        tracing::info!(
            pages = stats.listing_pages,
            records = stats.records_emitted,
            duplicates = stats.duplicates_skipped,
            closed = stats.closed_skipped,
            failed = stats.requests_failed,
            "crawl finished"
        );
        stats
    }
}

#[cfg(test)]
#[path = "crawler_test.rs"]
mod tests;
