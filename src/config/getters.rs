//! Getter methods for `ScrapeConfig`
//!
//! Besides plain accessors, this is where the kind profile and the user
//! overrides are folded into the engine's policy stack.

use std::path::Path;
use std::time::Duration;

use super::profile::ScrapeKind;
use super::types::ScrapeConfig;
use crate::browser_setup::LaunchOptions;
use crate::scrape_engine::{BatchPolicy, ChunkPolicy, LoadMode, PassPolicy, RetryPolicy};

impl ScrapeConfig {
    #[must_use]
    pub fn scrape_kind(&self) -> ScrapeKind {
        self.scrape_kind
    }

    #[must_use]
    pub fn supervised(&self) -> bool {
        self.supervised
    }

    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    #[must_use]
    pub fn first_attempt(&self) -> LoadMode {
        self.first_attempt
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn chrome_data_dir(&self) -> Option<&Path> {
        self.chrome_data_dir.as_deref()
    }

    #[must_use]
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_millis(self.page_load_timeout_ms)
    }

    #[must_use]
    pub fn element_timeout(&self) -> Duration {
        Duration::from_millis(self.element_timeout_ms)
    }

    #[must_use]
    pub fn health_probe_timeout(&self) -> Duration {
        Duration::from_millis(self.health_probe_timeout_ms)
    }

    /// Failure-streak limit after applying the override
    #[must_use]
    pub fn streak_limit(&self) -> usize {
        self.streak_limit
            .unwrap_or_else(|| self.scrape_kind.profile(self.supervised).streak_limit)
    }

    /// Pass budget after applying the override
    #[must_use]
    pub fn max_passes(&self) -> usize {
        self.max_passes
            .unwrap_or_else(|| self.scrape_kind.profile(self.supervised).max_passes)
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        let profile = self.scrape_kind.profile(self.supervised);
        RetryPolicy {
            delay: self.retry_delay.unwrap_or(profile.retry.delay),
            first_attempt: self.first_attempt,
        }
    }

    /// Full policy stack for a super-scrape run
    #[must_use]
    pub fn chunk_policy(&self) -> ChunkPolicy {
        ChunkPolicy {
            passes: PassPolicy {
                batch: BatchPolicy {
                    retry: self.retry_policy(),
                    streak_limit: self.streak_limit(),
                    health_probe_timeout: self.health_probe_timeout(),
                },
                max_passes: self.max_passes(),
            },
            chunk_size: self.chunk_size,
            chunk_pause: self.chunk_pause,
        }
    }

    #[must_use]
    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            headless: self.headless,
            chrome_data_dir: self.chrome_data_dir.clone(),
            request_timeout: self.page_load_timeout(),
        }
    }
}
