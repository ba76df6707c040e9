//! Scrape Engine Module
//!
//! Layered, strictly sequential scraping over one browser session:
//!
//! - [`single_item`]: one attempt (navigate, extract)
//! - [`retry`]: two attempts per item
//! - [`batch`]: one ordered pass with health probes and a failure-streak stop
//! - [`supervisor`]: repeated passes over failed and pending items
//! - [`super_scrape`]: chunked runs with per-chunk recovery
//!
//! Nothing here spawns tasks. The session is borrowed mutably by exactly
//! one operation at a time.

use std::collections::HashSet;
use std::hash::Hash;

pub mod batch;
pub mod policy;
pub mod progress;
pub mod retry;
pub mod single_item;
pub mod super_scrape;
pub mod supervisor;
pub mod types;

pub use batch::{BatchResult, BatchStop, run_batch};
pub use policy::{BatchPolicy, ChunkPolicy, DelayRange, LoadMode, PassPolicy, RetryPolicy};
pub use progress::{LogProgress, NoOpProgress, ProgressReporter};
pub use retry::scrape_with_retry;
pub use single_item::scrape_single_item;
pub use super_scrape::{SuperScrapeOutcome, super_scrape};
pub use supervisor::{PassOutcome, run_passes};
pub use types::{FailureKind, ItemOutcome, ScrapeFailure};

/// Drop repeated items, keeping the first occurrence of each
pub fn dedup_items<W: Clone + Eq + Hash>(items: &[W]) -> Vec<W> {
    let mut seen = HashSet::with_capacity(items.len());
    let deduped: Vec<W> = items
        .iter()
        .filter(|item| seen.insert(*item))
        .cloned()
        .collect();
    if deduped.len() < items.len() {
        log::debug!(
            target: "matchscrape::engine",
            "Dropped {} duplicate items",
            items.len() - deduped.len()
        );
    }
    deduped
}
