//! `scrape` subcommand: crawl, then validate, persist and audit every record.

use std::collections::HashSet;
use std::time::Duration;

use disaster_core::{load_area_filter, AppConfig, AreaFilter};
use disaster_scraper::{CrawlCoordinator, CrawlMode, DisasterClient};
use sqlx::PgPool;

use crate::pipeline::store::PgStore;
use crate::pipeline::Pipeline;

/// Name recorded in `scraper_audit` and the audit file.
pub(crate) const RUN_NAME: &str = "disasterassist";

pub(crate) fn source_system() -> String {
    format!("disaster-cli v{}", env!("CARGO_PKG_VERSION"))
}

pub(crate) fn load_filter(config: &AppConfig) -> anyhow::Result<AreaFilter> {
    match &config.area_filter_path {
        Some(path) => {
            let filter = load_area_filter(path)?;
            tracing::info!(path = %path.display(), "loaded area filter override");
            Ok(filter)
        }
        None => Ok(AreaFilter::default()),
    }
}

pub(crate) async fn run_scrape(
    pool: &PgPool,
    config: &AppConfig,
    mode: CrawlMode,
) -> anyhow::Result<()> {
    let area_filter = load_filter(config)?;

    let closed_elsewhere = match mode {
        CrawlMode::Full => HashSet::new(),
        CrawlMode::Rescrape => {
            let closed = disaster_db::list_closed_agrns(pool).await?;
            tracing::info!(closed = closed.len(), "loaded closed disasters");
            closed
        }
    };

    let client = DisasterClient::new(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
        config.scraper_max_retries,
        config.scraper_retry_backoff_base_ms,
    )?;

    let coordinator =
        CrawlCoordinator::new(config.seed_url.clone(), mode, closed_elsewhere, area_filter);
    let mut pipeline = Pipeline::new(PgStore::new(pool.clone()), RUN_NAME, &source_system());

    let stats = coordinator
        .run(
            &client,
            Duration::from_millis(config.scraper_inter_request_delay_ms),
            &mut pipeline,
        )
        .await;
    let summary = pipeline.finish(&config.audit_dir).await;

    tracing::info!(
        mode = %mode,
        pages = stats.listing_pages,
        extracted = stats.records_emitted,
        failed_requests = stats.requests_failed,
        dropped = summary.dropped,
        saved = summary.saved,
        errors = summary.errors,
        audited = summary.audited,
        "scrape complete"
    );
    Ok(())
}
