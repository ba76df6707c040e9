//! Type-safe builder for `ScrapeConfig` using the typestate pattern
//!
//! The scrape kind picks every default threshold, so it must be chosen
//! before the config can be built. Setters are available in every state.

use std::marker::PhantomData;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use super::profile::ScrapeKind;
use super::types::ScrapeConfig;
use crate::scrape_engine::{DelayRange, LoadMode};

// Type states for the builder
pub struct WithKind;

pub struct ScrapeConfigBuilder<State = ()> {
    config: ScrapeConfig,
    _phantom: PhantomData<State>,
}

impl Default for ScrapeConfigBuilder<()> {
    fn default() -> Self {
        Self {
            config: ScrapeConfig::default(),
            _phantom: PhantomData,
        }
    }
}

impl ScrapeConfig {
    /// Create a builder for configuring a `ScrapeConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ScrapeConfigBuilder<()> {
        ScrapeConfigBuilder::default()
    }
}

impl ScrapeConfigBuilder<()> {
    #[must_use]
    pub fn scrape_kind(mut self, kind: ScrapeKind) -> ScrapeConfigBuilder<WithKind> {
        self.config.scrape_kind = kind;
        ScrapeConfigBuilder {
            config: self.config,
            _phantom: PhantomData,
        }
    }
}

impl ScrapeConfig {
    /// Reopen a finished config for further overrides
    #[must_use]
    pub fn into_builder(self) -> ScrapeConfigBuilder<WithKind> {
        ScrapeConfigBuilder {
            config: self,
            _phantom: PhantomData,
        }
    }
}

impl ScrapeConfigBuilder<WithKind> {
    /// Switch to another kind; thresholds follow the new kind's profile
    /// unless overridden
    #[must_use]
    pub fn scrape_kind(mut self, kind: ScrapeKind) -> Self {
        self.config.scrape_kind = kind;
        self
    }

    /// Validate and produce the config
    ///
    /// # Errors
    ///
    /// Returns an error if any value fails [`ScrapeConfig::validate`].
    pub fn build(self) -> Result<ScrapeConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl<State> ScrapeConfigBuilder<State> {
    #[must_use]
    pub fn supervised(mut self, supervised: bool) -> Self {
        self.config.supervised = supervised;
        self
    }

    #[must_use]
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    #[must_use]
    pub fn retry_delay(mut self, delay: DelayRange) -> Self {
        self.config.retry_delay = Some(delay);
        self
    }

    #[must_use]
    pub fn chunk_pause(mut self, pause: DelayRange) -> Self {
        self.config.chunk_pause = pause;
        self
    }

    /// Override the kind's failure-streak limit
    #[must_use]
    pub fn streak_limit(mut self, limit: usize) -> Self {
        self.config.streak_limit = Some(limit);
        self
    }

    /// Override the kind's pass budget
    #[must_use]
    pub fn max_passes(mut self, passes: usize) -> Self {
        self.config.max_passes = Some(passes);
        self
    }

    #[must_use]
    pub fn first_attempt(mut self, mode: LoadMode) -> Self {
        self.config.first_attempt = mode;
        self
    }

    #[must_use]
    pub fn page_load_timeout(mut self, timeout: Duration) -> Self {
        self.config.page_load_timeout_ms = millis(timeout);
        self
    }

    #[must_use]
    pub fn element_timeout(mut self, timeout: Duration) -> Self {
        self.config.element_timeout_ms = millis(timeout);
        self
    }

    #[must_use]
    pub fn health_probe_timeout(mut self, timeout: Duration) -> Self {
        self.config.health_probe_timeout_ms = millis(timeout);
        self
    }

    /// Set browser headless mode
    ///
    /// Headed mode needs a display server and is meant for watching a
    /// supervised run.
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    /// Use a fixed browser profile directory instead of a temp one
    ///
    /// A caller-supplied directory is left in place at shutdown.
    #[must_use]
    pub fn chrome_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.chrome_data_dir = Some(dir.into());
        self
    }
}

/// Whole milliseconds of `timeout`, saturating
fn millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}
