//! Core configuration type for scrape runs
//!
//! `ScrapeConfig` holds everything a run needs: which profile to start from,
//! overrides on top of it, and browser launch settings. It can be built in
//! code through the builder or loaded from a JSON file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::profile::ScrapeKind;
use crate::scrape_engine::{DelayRange, LoadMode};
use crate::utils::{
    DEFAULT_CHUNK_PAUSE_SECS, DEFAULT_CHUNK_SIZE, DEFAULT_ELEMENT_TIMEOUT_SECS,
    DEFAULT_HEALTH_PROBE_TIMEOUT_SECS, DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
};

/// Main configuration struct for scrape runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrapeConfig {
    pub(crate) scrape_kind: ScrapeKind,

    /// Supervised runs have a person watching and tolerate longer failure
    /// streaks before stopping a pass.
    pub(crate) supervised: bool,

    pub(crate) chunk_size: usize,

    /// Overrides the profile's retry pause
    pub(crate) retry_delay: Option<DelayRange>,
    pub(crate) chunk_pause: DelayRange,

    /// Overrides the profile's failure-streak limit
    pub(crate) streak_limit: Option<usize>,
    /// Overrides the profile's pass budget
    pub(crate) max_passes: Option<usize>,

    pub(crate) first_attempt: LoadMode,

    /// Timeouts in milliseconds
    pub(crate) page_load_timeout_ms: u64,
    pub(crate) element_timeout_ms: u64,
    pub(crate) health_probe_timeout_ms: u64,

    pub(crate) headless: bool,
    pub(crate) chrome_data_dir: Option<PathBuf>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        let (pause_min, pause_max) = DEFAULT_CHUNK_PAUSE_SECS;
        Self {
            scrape_kind: ScrapeKind::default(),
            supervised: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
            retry_delay: None,
            chunk_pause: DelayRange::from_secs(pause_min, pause_max),
            streak_limit: None,
            max_passes: None,
            first_attempt: LoadMode::Navigate,
            page_load_timeout_ms: DEFAULT_PAGE_LOAD_TIMEOUT_SECS * 1000,
            element_timeout_ms: DEFAULT_ELEMENT_TIMEOUT_SECS * 1000,
            health_probe_timeout_ms: DEFAULT_HEALTH_PROBE_TIMEOUT_SECS * 1000,
            headless: true,
            chrome_data_dir: None,
        }
    }
}

impl ScrapeConfig {
    /// Load and validate a JSON config file
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, has
    /// unknown fields, or fails validation.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            anyhow::bail!("chunk_size must be at least 1");
        }
        if self.streak_limit == Some(0) {
            anyhow::bail!("streak_limit must be at least 1");
        }
        if self.max_passes == Some(0) {
            anyhow::bail!("max_passes must be at least 1");
        }
        for (name, ms) in [
            ("page_load_timeout_ms", self.page_load_timeout_ms),
            ("element_timeout_ms", self.element_timeout_ms),
            ("health_probe_timeout_ms", self.health_probe_timeout_ms),
        ] {
            if ms == 0 {
                anyhow::bail!("{name} must be at least 1");
            }
        }
        for (name, range) in [("retry_delay", self.retry_delay), ("chunk_pause", Some(self.chunk_pause))] {
            if let Some(range) = range
                && range.min_ms > range.max_ms
            {
                anyhow::bail!("{name}: min_ms {} exceeds max_ms {}", range.min_ms, range.max_ms);
            }
        }
        Ok(())
    }
}
