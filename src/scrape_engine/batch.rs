//! One pass over an item list
//!
//! Items are scraped strictly in order through the retry controller. Before
//! each item the session gets a liveness probe. A run of consecutive failed
//! items usually means the site is throttling or the layout changed, so once
//! the streak reaches the policy limit the pass stops and the untouched tail
//! is handed back as pending.

use log::{debug, warn};

use super::policy::BatchPolicy;
use super::progress::ProgressReporter;
use super::retry::scrape_with_retry;
use super::types::ItemOutcome;
use crate::page_extractor::PageExtractor;
use crate::session::{BrowserSession, SessionHealth, check_session_health};

/// Why a pass ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStop {
    /// Every item was attempted
    Completed,
    /// `streak` consecutive items failed
    FailureStreak { streak: usize },
    /// The liveness probe failed before an item
    SessionLost { reason: String },
}

/// Items and records produced by one pass
///
/// Every input item lands in exactly one of `succeeded_items`, `failed` or
/// `pending`, in input order within each list.
#[derive(Debug, Clone)]
pub struct BatchResult<W, R> {
    /// Records of all succeeded items, in item order
    pub succeeded: Vec<R>,
    pub succeeded_items: Vec<W>,
    /// Items that failed both attempts
    pub failed: Vec<W>,
    /// Items never attempted because the pass stopped early
    pub pending: Vec<W>,
    pub stop: BatchStop,
}

impl<W: Clone, R> BatchResult<W, R> {
    /// Items still needing work: failed followed by pending
    ///
    /// Failed items all precede the stop point, so this is input order.
    #[must_use]
    pub fn unfinished(&self) -> Vec<W> {
        self.failed.iter().chain(&self.pending).cloned().collect()
    }

    #[must_use]
    pub fn session_lost(&self) -> bool {
        matches!(self.stop, BatchStop::SessionLost { .. })
    }
}

/// Scrape `items` in order, stopping early on a failure streak or a dead session
pub async fn run_batch<S, E, P>(
    session: &mut S,
    extractor: &E,
    items: &[E::Item],
    policy: &BatchPolicy,
    progress: &P,
) -> BatchResult<E::Item, E::Record>
where
    S: BrowserSession,
    E: PageExtractor<S>,
    P: ProgressReporter + ?Sized,
{
    let streak_limit = policy.streak_limit.max(1);
    let mut result = BatchResult {
        succeeded: Vec::new(),
        succeeded_items: Vec::new(),
        failed: Vec::new(),
        pending: Vec::new(),
        stop: BatchStop::Completed,
    };
    let mut streak = 0usize;

    for (index, item) in items.iter().enumerate() {
        if let SessionHealth::Unhealthy { reason } =
            check_session_health(&*session, policy.health_probe_timeout).await
        {
            warn!(
                target: "matchscrape::batch",
                "Session unhealthy before {item}, abandoning {} items",
                items.len() - index
            );
            progress.report_session_lost(&reason);
            result.pending = items[index..].to_vec();
            result.stop = BatchStop::SessionLost { reason };
            return result;
        }

        let label = item.to_string();
        match scrape_with_retry(session, extractor, item, &policy.retry).await {
            ItemOutcome::Scraped(records) => {
                streak = 0;
                progress.report_item_scraped(&label, records.len());
                result.succeeded.extend(records);
                result.succeeded_items.push(item.clone());
            }
            ItemOutcome::Failed => {
                streak += 1;
                progress.report_item_failed(&label);
                result.failed.push(item.clone());
                if streak >= streak_limit {
                    let pending = &items[index + 1..];
                    warn!(
                        target: "matchscrape::batch",
                        "{streak} consecutive failures, stopping pass with {} items pending",
                        pending.len()
                    );
                    progress.report_streak_abort(streak, pending.len());
                    result.pending = pending.to_vec();
                    result.stop = BatchStop::FailureStreak { streak };
                    return result;
                }
            }
        }
    }

    debug!(
        target: "matchscrape::batch",
        "Pass complete: {} succeeded, {} failed",
        result.succeeded_items.len(),
        result.failed.len()
    );
    result
}
