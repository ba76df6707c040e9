//! Session liveness probe
//!
//! Asks the session for its current URL under a short deadline. Any error or
//! a missed deadline means the session is unusable and every later
//! operation on it would fail, so callers stop work instead of burning
//! retries against a dead browser.

use std::time::Duration;

use log::{debug, warn};

use super::BrowserSession;

/// Result of a liveness probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionHealth {
    Healthy,
    Unhealthy { reason: String },
}

impl SessionHealth {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}

/// Probe the session with a current-URL query
///
/// Never returns an error: every failure mode of the probe is folded into
/// [`SessionHealth::Unhealthy`].
pub async fn check_session_health<S>(session: &S, probe_timeout: Duration) -> SessionHealth
where
    S: BrowserSession + ?Sized,
{
    match tokio::time::timeout(probe_timeout, session.current_url()).await {
        Ok(Ok(url)) => {
            debug!(target: "matchscrape::health", "Session healthy (at {url})");
            SessionHealth::Healthy
        }
        Ok(Err(e)) => {
            warn!(target: "matchscrape::health", "Session probe failed: {e}");
            SessionHealth::Unhealthy {
                reason: e.to_string(),
            }
        }
        Err(_) => {
            warn!(
                target: "matchscrape::health",
                "Session probe did not answer within {} seconds",
                probe_timeout.as_secs()
            );
            SessionHealth::Unhealthy {
                reason: format!(
                    "health probe timeout after {} seconds",
                    probe_timeout.as_secs()
                ),
            }
        }
    }
}
