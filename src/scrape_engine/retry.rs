//! Two-attempt retry controller
//!
//! Every item gets a first attempt and, if that fails, exactly one more
//! after a jittered pause. The second attempt always re-navigates so a
//! half-rendered or stale page cannot fail it twice.

use log::info;

use super::policy::{LoadMode, RetryPolicy};
use super::single_item::scrape_single_item;
use super::types::ItemOutcome;
use crate::page_extractor::PageExtractor;
use crate::session::BrowserSession;

/// Scrape `item` with at most two attempts
pub async fn scrape_with_retry<S, E>(
    session: &mut S,
    extractor: &E,
    item: &E::Item,
    policy: &RetryPolicy,
) -> ItemOutcome<E::Record>
where
    S: BrowserSession,
    E: PageExtractor<S>,
{
    if let Ok(records) = scrape_single_item(session, extractor, item, policy.first_attempt).await {
        return ItemOutcome::Scraped(records);
    }

    let delay = policy.delay.sample();
    info!(
        target: "matchscrape::retry",
        "Retrying {item} in {:.1}s",
        delay.as_secs_f64()
    );
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    match scrape_single_item(session, extractor, item, LoadMode::Navigate).await {
        Ok(records) => ItemOutcome::Scraped(records),
        Err(_) => ItemOutcome::Failed,
    }
}
