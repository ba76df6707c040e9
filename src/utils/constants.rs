//! Shared configuration constants for matchscrape
//!
//! Default timing and sizing values used across the scrape engine so that the
//! config layer, the CLI and the tests agree on one set of numbers.

/// Default number of work items per super-scrape chunk
///
/// A chunk is the recovery unit of a long run. Large enough that the per-chunk
/// health probe and pause are negligible, small enough that losing the browser
/// forfeits at most one chunk of completed work.
pub const DEFAULT_CHUNK_SIZE: usize = 400;

/// Jittered pause before a retry attempt, in seconds (inclusive bounds)
pub const DEFAULT_RETRY_DELAY_SECS: (u64, u64) = (3, 6);

/// Shorter pause before re-driving an in-page schedule navigation, such as a
/// season switch that did not settle
pub const SCHEDULE_RETRY_DELAY_SECS: (u64, u64) = (2, 5);

/// Jittered pause between super-scrape chunks, in seconds (inclusive bounds)
pub const DEFAULT_CHUNK_PAUSE_SECS: (u64, u64) = (3, 6);

/// Timeout for a single page navigation
pub const DEFAULT_PAGE_LOAD_TIMEOUT_SECS: u64 = 30;

/// Timeout for the extractor's "page is ready" element wait
pub const DEFAULT_ELEMENT_TIMEOUT_SECS: u64 = 15;

/// Timeout for the session liveness probe
///
/// A live browser answers a current-URL query in milliseconds. Anything past
/// this bound is treated as a dead session.
pub const DEFAULT_HEALTH_PROBE_TIMEOUT_SECS: u64 = 5;

/// Poll interval while waiting for an element to render
pub const ELEMENT_POLL_INTERVAL_MS: u64 = 100;

/// Chrome user agent string presented by the launched browser
///
/// Updated: 2025-01-29 to Chrome 132 (current stable)
///
/// Reference: https://chromiumdash.appspot.com/schedule
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
