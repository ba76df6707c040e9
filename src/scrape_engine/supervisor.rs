//! Multi-pass supervisor
//!
//! Runs batch passes until nothing is left, the pass budget is spent, or the
//! session dies. Each later pass covers exactly the items the previous pass
//! left failed or pending.
//!
//! A batch only notices a dead session when probing before its next item, so
//! a crash on the last attempted item would go unseen. The supervisor probes
//! once more after its final pass to catch that.

use std::collections::HashSet;

use log::{info, warn};

use super::batch::run_batch;
use super::dedup_items;
use super::policy::PassPolicy;
use super::progress::ProgressReporter;
use crate::page_extractor::PageExtractor;
use crate::session::{BrowserSession, SessionHealth, check_session_health};

/// Result of a supervised run
#[derive(Debug, Clone)]
pub struct PassOutcome<W, R> {
    /// Records of every succeeded item, each item's records exactly once
    pub records: Vec<R>,
    /// Input items that never succeeded, in input order
    pub missed: Vec<W>,
    /// Number of passes actually run
    pub passes: usize,
    /// The run stopped because the session died
    pub session_lost: bool,
}

/// Scrape `items` with up to `policy.max_passes` passes
///
/// Duplicate items in the input are scraped once.
pub async fn run_passes<S, E, P>(
    session: &mut S,
    extractor: &E,
    items: &[E::Item],
    policy: &PassPolicy,
    progress: &P,
) -> PassOutcome<E::Item, E::Record>
where
    S: BrowserSession,
    E: PageExtractor<S>,
    P: ProgressReporter + ?Sized,
{
    let items = dedup_items(items);
    let max_passes = policy.max_passes.max(1);

    let mut records = Vec::new();
    let mut succeeded: HashSet<E::Item> = HashSet::new();
    let mut remaining = items.clone();
    let mut passes = 0;
    let mut session_lost = false;

    while !remaining.is_empty() && passes < max_passes {
        passes += 1;
        progress.report_pass_started(passes, remaining.len());
        info!(
            target: "matchscrape::supervisor",
            "Pass {passes}/{max_passes} over {} items",
            remaining.len()
        );

        let batch = run_batch(session, extractor, &remaining, &policy.batch, progress).await;
        let lost = batch.session_lost();
        records.extend(batch.succeeded);
        succeeded.extend(batch.succeeded_items);

        if lost {
            warn!(
                target: "matchscrape::supervisor",
                "Session lost during pass {passes}, no further passes"
            );
            session_lost = true;
            break;
        }
        remaining = batch.failed.into_iter().chain(batch.pending).collect();
    }

    if passes > 0
        && !session_lost
        && let SessionHealth::Unhealthy { reason } =
            check_session_health(&*session, policy.batch.health_probe_timeout).await
    {
        warn!(
            target: "matchscrape::supervisor",
            "Session died during pass {passes}"
        );
        progress.report_session_lost(&reason);
        session_lost = true;
    }

    let missed: Vec<E::Item> = items
        .into_iter()
        .filter(|item| !succeeded.contains(item))
        .collect();
    if !missed.is_empty() {
        info!(
            target: "matchscrape::supervisor",
            "{} items missed after {passes} passes",
            missed.len()
        );
    }

    PassOutcome {
        records,
        missed,
        passes,
        session_lost,
    }
}
