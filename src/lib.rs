pub mod browser_setup;
pub mod config;
pub mod page_extractor;
pub mod report;
pub mod scrape_engine;
pub mod session;
pub mod utils;
pub mod work_item;

pub use browser_setup::{LaunchOptions, download_managed_browser, find_browser_executable, launch_browser};
pub use config::{ScrapeConfig, ScrapeKind};
pub use page_extractor::{ExtractError, PageExtractor, PageSnapshot, RenderedPageExtractor};
pub use report::ScrapeReport;
pub use scrape_engine::{
    BatchResult, BatchStop, ItemOutcome, LogProgress, NoOpProgress, PassOutcome, ProgressReporter,
    ScrapeFailure, SuperScrapeOutcome, run_batch, run_passes, scrape_single_item,
    scrape_with_retry, super_scrape,
};
pub use session::{BrowserSession, ChromiumSession, SessionError, SessionHealth, check_session_health};
pub use work_item::{MatchUrl, SeasonTarget, WorkItem};

use log::{info, warn};

use session::CleanupResult;

/// Launch a browser, super-scrape `items` with it, and shut it down
///
/// The browser is shut down even when the session died mid-run.
///
/// # Errors
///
/// Returns an error only if the browser cannot be launched. Scrape failures
/// are reported through the outcome's `missed` list.
pub async fn scrape_with_browser<E, P>(
    config: &ScrapeConfig,
    extractor: &E,
    items: &[E::Item],
    progress: &P,
) -> anyhow::Result<SuperScrapeOutcome<E::Item, E::Record>>
where
    E: PageExtractor<ChromiumSession>,
    P: ProgressReporter + ?Sized,
{
    let mut session = ChromiumSession::launch(&config.launch_options(), config.page_load_timeout()).await?;
    info!(
        target: "matchscrape::run",
        "Scraping {} {} targets (supervised: {})",
        items.len(),
        config.scrape_kind().label(),
        config.supervised()
    );

    let outcome = super_scrape(&mut session, extractor, items, &config.chunk_policy(), progress).await;

    if let CleanupResult::PartialFailure(errors) = session.shutdown().await {
        for error in errors {
            warn!(target: "matchscrape::run", "Browser cleanup: {error}");
        }
    }
    Ok(outcome)
}
