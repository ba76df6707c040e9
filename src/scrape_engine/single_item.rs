//! One scrape attempt for one item
//!
//! Loads the page (unless told it is already loaded) and runs the extractor.
//! Every error collapses into a [`ScrapeFailure`]; the cause is logged here
//! and nowhere above.

use log::{debug, warn};

use super::policy::LoadMode;
use super::types::ScrapeFailure;
use crate::page_extractor::{ExtractError, PageExtractor};
use crate::session::BrowserSession;
use crate::work_item::WorkItem;

async fn attempt<S, E>(
    session: &mut S,
    extractor: &E,
    item: &E::Item,
    mode: LoadMode,
) -> Result<Vec<E::Record>, ExtractError>
where
    S: BrowserSession,
    E: PageExtractor<S>,
{
    if mode == LoadMode::Navigate {
        session.navigate(item.url()).await?;
    }
    extractor.extract(session, item).await
}

/// Run one attempt for `item`
///
/// # Errors
///
/// Returns a [`ScrapeFailure`] if navigation or extraction fails for any
/// reason.
pub async fn scrape_single_item<S, E>(
    session: &mut S,
    extractor: &E,
    item: &E::Item,
    mode: LoadMode,
) -> Result<Vec<E::Record>, ScrapeFailure>
where
    S: BrowserSession,
    E: PageExtractor<S>,
{
    match attempt(session, extractor, item, mode).await {
        Ok(records) => {
            debug!(target: "matchscrape::item", "{item}: {} records", records.len());
            Ok(records)
        }
        Err(e) => {
            let failure = ScrapeFailure::new(item, &e);
            warn!(target: "matchscrape::item", "{item}: {} failure: {e}", failure.kind);
            Err(failure)
        }
    }
}
