//! Browser session abstraction
//!
//! The scrape engine drives exactly one long-lived browser session. It only
//! ever asks two things of it: where are you, and go there. Everything else
//! (DOM queries, element waits, HTML capture) belongs to the page extractor
//! that is paired with a concrete session type.

pub mod chromium;
pub mod health;
pub mod page_timeout;
pub mod wait;

use async_trait::async_trait;
use std::time::Duration;

pub use chromium::{ChromiumSession, CleanupResult};
pub use health::{SessionHealth, check_session_health};
pub use page_timeout::with_page_timeout;
pub use wait::{ElementWait, wait_for_selector};

/// Errors raised by a browser session
#[derive(Debug, Clone, thiserror::Error)]
pub enum SessionError {
    /// Navigation was rejected or the page failed to load
    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    /// A session operation exceeded its deadline
    #[error("{operation} timeout after {} seconds", timeout.as_secs())]
    Timeout {
        operation: String,
        timeout: Duration,
    },

    /// The browser or its page target is gone
    #[error("browser session closed: {0}")]
    Closed(String),

    /// Any other DevTools protocol failure
    #[error("browser protocol error: {0}")]
    Protocol(String),
}

/// A live, stateful browser session
///
/// Implementations keep a single current page. The engine never runs two
/// operations on a session concurrently.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// URL of the currently loaded page
    ///
    /// This is the liveness probe: a dead browser fails this call (or never
    /// answers it).
    async fn current_url(&self) -> Result<String, SessionError>;

    /// Load `url` in the current page and wait for the navigation to settle
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError>;
}
