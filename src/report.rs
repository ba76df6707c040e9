//! JSON run report
//!
//! What a run produced, what it missed and how long it took, written as a
//! single JSON document. `missed` is written as plain strings so it can be
//! pasted back into a targets file for the follow-up run.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::ScrapeKind;
use crate::scrape_engine::SuperScrapeOutcome;

#[derive(Debug, Serialize)]
pub struct ScrapeReport<R> {
    pub kind: ScrapeKind,
    pub supervised: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_secs: f64,
    pub targets: usize,
    pub scraped: usize,
    pub chunks_completed: usize,
    pub chunks_total: usize,
    pub session_lost: bool,
    pub missed: Vec<String>,
    pub records: Vec<R>,
}

impl<R: Serialize> ScrapeReport<R> {
    /// Build a report from a finished run
    ///
    /// `targets` is the number of distinct items the run was given.
    pub fn from_outcome<W: std::fmt::Display>(
        kind: ScrapeKind,
        supervised: bool,
        targets: usize,
        started_at: DateTime<Utc>,
        outcome: SuperScrapeOutcome<W, R>,
    ) -> Self {
        let finished_at = Utc::now();
        let elapsed_secs = (finished_at - started_at)
            .to_std()
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();
        Self {
            kind,
            supervised,
            started_at,
            finished_at,
            elapsed_secs,
            targets,
            scraped: targets.saturating_sub(outcome.missed.len()),
            chunks_completed: outcome.chunks_completed,
            chunks_total: outcome.chunks_total,
            session_lost: outcome.session_lost,
            missed: outcome.missed.iter().map(ToString::to_string).collect(),
            records: outcome.records,
        }
    }

    /// Write the report as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report {}", path.display()))
    }
}
