//! Rendered page snapshots
//!
//! The stock extractor used by the CLI. It waits for the page to finish
//! client-side rendering, optionally switches a season dropdown, and captures
//! the rendered HTML as one [`PageSnapshot`] record per item. Parsing the
//! snapshot into incidents or stat rows happens downstream.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chromiumoxide::Page;
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use super::js_scripts::{PAGE_SUMMARY_SCRIPT, READY_STATE_SCRIPT, select_season_script};
use super::{ExtractError, PageExtractor};
use crate::scrape_engine::RetryPolicy;
use crate::session::{
    BrowserSession, ChromiumSession, ElementWait, SessionError, wait_for_selector,
    with_page_timeout,
};
use crate::utils::ELEMENT_POLL_INTERVAL_MS;
use crate::work_item::{WorkItem, match_id_from_url};

/// Rendered HTML of one scraped page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// The work item, as displayed in logs
    pub target: String,
    /// Page URL after any redirects
    pub url: String,
    pub match_id: Option<u64>,
    pub season: Option<String>,
    pub title: Option<String>,
    pub heading: Option<String>,
    pub html: String,
    pub captured_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct PageSummary {
    title: Option<String>,
    heading: Option<String>,
}

/// Captures the rendered page for any work item type
pub struct RenderedPageExtractor<W> {
    ready_selector: Option<String>,
    ready_wait: ElementWait,
    season_select: Option<String>,
    /// Pause before re-driving a season switch that did not settle
    season_retry: RetryPolicy,
    _item: PhantomData<fn() -> W>,
}

impl<W> Default for RenderedPageExtractor<W> {
    fn default() -> Self {
        Self {
            ready_selector: None,
            ready_wait: ElementWait::CRITICAL,
            season_select: None,
            season_retry: RetryPolicy::schedule_navigation(),
            _item: PhantomData,
        }
    }
}

impl<W> RenderedPageExtractor<W> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `selector` to render before the page counts as loaded
    #[must_use]
    pub fn with_ready_selector(mut self, selector: impl Into<String>) -> Self {
        self.ready_selector = Some(selector.into());
        self
    }

    #[must_use]
    pub fn with_ready_wait(mut self, wait: impl Into<ElementWait>) -> Self {
        self.ready_wait = wait.into();
        self
    }

    /// `<select>` to drive for items that carry a season
    #[must_use]
    pub fn with_season_select(mut self, selector: impl Into<String>) -> Self {
        self.season_select = Some(selector.into());
        self
    }

    async fn wait_for_document(&self, page: &Page) {
        let start = Instant::now();
        let poll_interval = Duration::from_millis(ELEMENT_POLL_INTERVAL_MS);
        while start.elapsed() < self.ready_wait.duration() {
            let ready = match page.evaluate(READY_STATE_SCRIPT).await {
                Ok(result) => result.into_value::<bool>().unwrap_or(false),
                Err(_) => false,
            };
            if ready {
                return;
            }
            tokio::time::sleep(poll_interval).await;
        }
        debug!("Document not complete after {:?}, continuing", start.elapsed());
    }

    /// Switch the season dropdown, retrying once if the reload hangs
    async fn select_season(&self, page: &Page, selector: &str, season: &str) -> Result<(), ExtractError> {
        match run_season_script(page, selector, season).await? {
            SeasonSwitch::Current => Ok(()),
            SeasonSwitch::Missing => Err(season_missing(selector, season)),
            SeasonSwitch::Selected => {
                let Err(err) = await_season_reload(page).await else {
                    return Ok(());
                };
                let delay = self.season_retry.delay.sample();
                debug!("Season switch to {season} did not settle ({err}), retrying in {delay:?}");
                tokio::time::sleep(delay).await;

                match run_season_script(page, selector, season).await? {
                    SeasonSwitch::Current => Ok(()),
                    SeasonSwitch::Missing => Err(season_missing(selector, season)),
                    SeasonSwitch::Selected => Ok(await_season_reload(page).await?),
                }
            }
        }
    }
}

/// Result of the season-select script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeasonSwitch {
    /// The dropdown changed and the page is reloading
    Selected,
    /// The season was already showing
    Current,
    Missing,
}

impl SeasonSwitch {
    fn parse(outcome: &str) -> Self {
        match outcome {
            "selected" => Self::Selected,
            "current" => Self::Current,
            _ => Self::Missing,
        }
    }
}

async fn run_season_script(page: &Page, selector: &str, season: &str) -> Result<SeasonSwitch, ExtractError> {
    let outcome: String = page
        .evaluate(select_season_script(selector, season))
        .await
        .map_err(|e| ExtractError::Script(e.to_string()))?
        .into_value()
        .map_err(|e| ExtractError::Script(e.to_string()))?;
    Ok(SeasonSwitch::parse(&outcome))
}

async fn await_season_reload(page: &Page) -> Result<(), SessionError> {
    with_page_timeout(
        async {
            page.wait_for_navigation()
                .await
                .map(|_| ())
                .map_err(|e| SessionError::Protocol(e.to_string()))
        },
        ElementWait::EXTENDED.duration(),
        "Season switch",
    )
    .await
}

fn season_missing(selector: &str, season: &str) -> ExtractError {
    ExtractError::UnexpectedContent(format!("season '{season}' not offered by `{selector}`"))
}

#[async_trait]
impl<W: WorkItem> PageExtractor<ChromiumSession> for RenderedPageExtractor<W> {
    type Item = W;
    type Record = PageSnapshot;

    async fn extract(
        &self,
        session: &mut ChromiumSession,
        item: &W,
    ) -> Result<Vec<PageSnapshot>, ExtractError> {
        let page = session.page();

        if let (Some(season), Some(selector)) = (item.season(), self.season_select.as_deref()) {
            self.select_season(page, selector, season).await?;
        }

        self.wait_for_document(page).await;
        if let Some(selector) = &self.ready_selector {
            wait_for_selector(page, selector, self.ready_wait).await?;
        }

        let html = page
            .content()
            .await
            .map_err(|e| ExtractError::Script(e.to_string()))?;
        let summary = match page.evaluate(PAGE_SUMMARY_SCRIPT).await {
            Ok(result) => result.into_value::<PageSummary>().ok(),
            Err(_) => None,
        };
        let url = session.current_url().await?;

        Ok(vec![PageSnapshot {
            target: item.to_string(),
            match_id: match_id_from_url(&url).or_else(|| match_id_from_url(item.url())),
            season: item.season().map(str::to_string),
            title: summary.as_ref().and_then(|s| s.title.clone()),
            heading: summary.and_then(|s| s.heading),
            url,
            html,
            captured_at: Utc::now(),
        }])
    }
}
