//! Tuning knobs for each layer of the scrape engine
//!
//! Policies nest the same way the layers do: a chunk policy owns a pass
//! policy, which owns a batch policy, which owns a retry policy. The config
//! layer builds the whole stack from a [`ScrapeKind`](crate::config::ScrapeKind)
//! profile plus user overrides.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::utils::{
    DEFAULT_CHUNK_PAUSE_SECS, DEFAULT_CHUNK_SIZE, DEFAULT_HEALTH_PROBE_TIMEOUT_SECS,
    DEFAULT_RETRY_DELAY_SECS, SCHEDULE_RETRY_DELAY_SECS,
};

/// Inclusive range for a uniformly jittered pause
///
/// Stored in milliseconds so config files stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    /// No pause at all
    pub const NONE: Self = Self {
        min_ms: 0,
        max_ms: 0,
    };

    /// Range between two whole-second bounds. Bounds are swapped if reversed.
    #[must_use]
    pub const fn from_secs(min: u64, max: u64) -> Self {
        if min <= max {
            Self {
                min_ms: min * 1000,
                max_ms: max * 1000,
            }
        } else {
            Self {
                min_ms: max * 1000,
                max_ms: min * 1000,
            }
        }
    }

    /// Draw a pause length uniformly from the range
    #[must_use]
    pub fn sample(&self) -> Duration {
        let (lo, hi) = if self.min_ms <= self.max_ms {
            (self.min_ms, self.max_ms)
        } else {
            (self.max_ms, self.min_ms)
        };
        if lo == hi {
            return Duration::from_millis(lo);
        }
        Duration::from_millis(rand::rng().random_range(lo..=hi))
    }

    /// Sleep for a sampled duration; returns immediately for a zero range
    pub async fn pause(&self) {
        let delay = self.sample();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Whether an attempt must load the page before extracting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// Navigate to the item's URL first
    #[default]
    Navigate,
    /// The session already shows the item's page
    AlreadyLoaded,
}

/// Per-item retry behaviour
///
/// An item gets exactly two attempts per pass. The second always
/// re-navigates, after a jittered delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delay: DelayRange,
    pub first_attempt: LoadMode,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        let (min, max) = DEFAULT_RETRY_DELAY_SECS;
        Self {
            delay: DelayRange::from_secs(min, max),
            first_attempt: LoadMode::Navigate,
        }
    }
}

impl RetryPolicy {
    /// Shorter pause for in-page schedule navigation, such as a season switch
    #[must_use]
    pub fn schedule_navigation() -> Self {
        let (min, max) = SCHEDULE_RETRY_DELAY_SECS;
        Self {
            delay: DelayRange::from_secs(min, max),
            first_attempt: LoadMode::Navigate,
        }
    }
}

/// One pass over a list of items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPolicy {
    pub retry: RetryPolicy,
    /// Consecutive failed items that abort the pass. Values below 1 act as 1.
    pub streak_limit: usize,
    pub health_probe_timeout: Duration,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            streak_limit: 10,
            health_probe_timeout: Duration::from_secs(DEFAULT_HEALTH_PROBE_TIMEOUT_SECS),
        }
    }
}

/// Repeated passes over whatever is left unscraped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassPolicy {
    pub batch: BatchPolicy,
    /// Values below 1 act as 1
    pub max_passes: usize,
}

impl Default for PassPolicy {
    fn default() -> Self {
        Self {
            batch: BatchPolicy::default(),
            max_passes: 2,
        }
    }
}

/// Chunked execution of a long item list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPolicy {
    pub passes: PassPolicy,
    /// Values below 1 act as 1
    pub chunk_size: usize,
    /// Pause between consecutive chunks
    pub chunk_pause: DelayRange,
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        let (min, max) = DEFAULT_CHUNK_PAUSE_SECS;
        Self {
            passes: PassPolicy::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_pause: DelayRange::from_secs(min, max),
        }
    }
}
