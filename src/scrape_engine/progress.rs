//! Progress reporting for scrape runs
//!
//! Defines the `ProgressReporter` trait the engine calls at lifecycle points,
//! a no-op reporter for library use, and a logging reporter for the CLI.

use log::{info, warn};

/// Lifecycle events of a scrape run
///
/// Items are passed as their display form so reporters do not need to be
/// generic over the work item type.
pub trait ProgressReporter: Send + Sync {
    /// A super-scrape chunk is about to start (`index` is zero-based)
    fn report_chunk_started(&self, index: usize, total: usize, items: usize);

    /// A supervisor pass is about to start (`pass` is one-based)
    fn report_pass_started(&self, pass: usize, items: usize);

    /// An item produced records
    fn report_item_scraped(&self, item: &str, records: usize);

    /// An item failed both attempts
    fn report_item_failed(&self, item: &str);

    /// A pass stopped early after too many consecutive failures
    fn report_streak_abort(&self, streak: usize, pending: usize);

    /// The browser session stopped answering
    fn report_session_lost(&self, reason: &str);

    /// The run finished
    fn report_completed(&self, scraped: usize, missed: usize);
}

/// Progress reporter that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    #[inline(always)]
    fn report_chunk_started(&self, _index: usize, _total: usize, _items: usize) {}

    #[inline(always)]
    fn report_pass_started(&self, _pass: usize, _items: usize) {}

    #[inline(always)]
    fn report_item_scraped(&self, _item: &str, _records: usize) {}

    #[inline(always)]
    fn report_item_failed(&self, _item: &str) {}

    #[inline(always)]
    fn report_streak_abort(&self, _streak: usize, _pending: usize) {}

    #[inline(always)]
    fn report_session_lost(&self, _reason: &str) {}

    #[inline(always)]
    fn report_completed(&self, _scraped: usize, _missed: usize) {}
}

/// Progress reporter that writes each event to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report_chunk_started(&self, index: usize, total: usize, items: usize) {
        info!(target: "matchscrape::progress", "Chunk {}/{total}: {items} items", index + 1);
    }

    fn report_pass_started(&self, pass: usize, items: usize) {
        info!(target: "matchscrape::progress", "Pass {pass}: {items} items");
    }

    fn report_item_scraped(&self, item: &str, records: usize) {
        info!(target: "matchscrape::progress", "Scraped {item} ({records} records)");
    }

    fn report_item_failed(&self, item: &str) {
        warn!(target: "matchscrape::progress", "Failed {item}");
    }

    fn report_streak_abort(&self, streak: usize, pending: usize) {
        warn!(
            target: "matchscrape::progress",
            "{streak} consecutive failures, deferring {pending} items to the next pass"
        );
    }

    fn report_session_lost(&self, reason: &str) {
        warn!(target: "matchscrape::progress", "Browser session lost: {reason}");
    }

    fn report_completed(&self, scraped: usize, missed: usize) {
        info!(target: "matchscrape::progress", "Done: {scraped} items scraped, {missed} missed");
    }
}
