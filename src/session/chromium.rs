//! Chromium-backed browser session
//!
//! Owns one browser process, its CDP handler task and a single page. All
//! navigation happens in that page, so the session behaves like a single
//! browser tab driven by the scrape engine.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::browser::Browser;
use log::{debug, info, warn};
use tokio::task::JoinHandle;

use super::page_timeout::with_page_timeout;
use super::{BrowserSession, SessionError};
use crate::browser_setup::{LaunchOptions, launch_browser};

/// Result of tearing down a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupResult {
    Success,
    /// Some teardown steps failed; the messages say which
    PartialFailure(Vec<String>),
}

pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    /// Profile directory to remove at shutdown. `None` once removed, or when
    /// the caller supplied the directory and owns it.
    owned_data_dir: Option<PathBuf>,
    page_load_timeout: Duration,
}

impl ChromiumSession {
    /// Launch a browser and open the page the session will drive
    ///
    /// # Errors
    ///
    /// Returns an error if no browser can be found or downloaded, or the
    /// browser refuses to open a page.
    pub async fn launch(options: &LaunchOptions, page_load_timeout: Duration) -> Result<Self> {
        let caller_owns_dir = options.chrome_data_dir.is_some();
        let (browser, handler, data_dir) = launch_browser(options).await?;

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler.abort();
                return Err(e).context("Failed to open scrape page");
            }
        };

        info!(target: "matchscrape::session", "Browser session ready");
        Ok(Self {
            browser,
            page,
            handler,
            owned_data_dir: (!caller_owns_dir).then_some(data_dir),
            page_load_timeout,
        })
    }

    /// The page this session navigates
    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Close the browser, wait for it to exit, and remove the temp profile
    pub async fn shutdown(mut self) -> CleanupResult {
        let mut errors = Vec::new();

        debug!(target: "matchscrape::session", "Closing browser");
        if let Err(e) = self.browser.close().await {
            warn!(target: "matchscrape::session", "Failed to close browser: {e}");
            errors.push(format!("Browser close failed: {e}"));
        }

        // The profile stays locked until the process has exited.
        if let Err(e) = self.browser.wait().await {
            warn!(target: "matchscrape::session", "Failed to wait for browser exit: {e}");
            errors.push(format!("Browser wait failed: {e}"));
        }

        if let Some(dir) = self.owned_data_dir.take()
            && let Err(e) = std::fs::remove_dir_all(&dir)
        {
            warn!(
                target: "matchscrape::session",
                "Failed to remove profile {}: {e}",
                dir.display()
            );
            errors.push(format!("Directory cleanup failed: {e}"));
        }

        if errors.is_empty() {
            CleanupResult::Success
        } else {
            CleanupResult::PartialFailure(errors)
        }
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        self.handler.abort();
        if let Some(dir) = self.owned_data_dir.take() {
            warn!(
                target: "matchscrape::session",
                "Session dropped without shutdown, removing {}",
                dir.display()
            );
            let _ = std::fs::remove_dir_all(&dir);
        }
    }
}

fn session_error(url: Option<&str>, err: impl std::fmt::Display) -> SessionError {
    let message = err.to_string();
    let lower = message.to_lowercase();
    // A dropped websocket or handler channel means the browser is gone.
    let closed = lower.contains("channel")
        || lower.contains("websocket")
        || lower.contains("connection closed")
        || lower.contains("no response");
    match url {
        _ if closed => SessionError::Closed(message),
        Some(url) => SessionError::Navigation {
            url: url.to_string(),
            message,
        },
        None => SessionError::Protocol(message),
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn current_url(&self) -> Result<String, SessionError> {
        match self.page.url().await {
            Ok(Some(url)) => Ok(url),
            Ok(None) => Ok("about:blank".to_string()),
            Err(e) => Err(session_error(None, e)),
        }
    }

    async fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        let page = &self.page;
        with_page_timeout(
            async move {
                page.goto(url).await.map_err(|e| session_error(Some(url), e))?;
                page.wait_for_navigation()
                    .await
                    .map_err(|e| session_error(Some(url), e))?;
                Ok(())
            },
            self.page_load_timeout,
            "Page navigation",
        )
        .await
    }
}
