//! Bounded element waits
//!
//! Match centre pages render their data client-side, so an element can be
//! missing for a few seconds after navigation settles. These helpers poll the
//! DOM until the element shows up or the wait budget runs out.

use std::time::Duration;

use chromiumoxide::Page;
use chromiumoxide::element::Element;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::page_extractor::ExtractError;
use crate::utils::ELEMENT_POLL_INTERVAL_MS;

/// Named wait budgets for element lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementWait(Duration);

impl ElementWait {
    /// Elements that are normally present on first paint
    pub const SHORT: Self = Self(Duration::from_secs(3));
    /// Default budget for client-rendered widgets
    pub const STANDARD: Self = Self(Duration::from_secs(5));
    /// Slow widgets such as stat tables behind a tab switch
    pub const EXTENDED: Self = Self(Duration::from_secs(10));
    /// Elements the extraction cannot proceed without
    pub const CRITICAL: Self = Self(Duration::from_secs(15));

    #[must_use]
    pub const fn duration(self) -> Duration {
        self.0
    }
}

impl From<Duration> for ElementWait {
    fn from(timeout: Duration) -> Self {
        Self(timeout)
    }
}

/// Wait until `selector` matches an element on `page`
///
/// # Errors
///
/// Returns [`ExtractError::ElementTimeout`] when nothing matched within the
/// wait budget.
pub async fn wait_for_selector(
    page: &Page,
    selector: &str,
    wait: ElementWait,
) -> Result<Element, ExtractError> {
    let start = Instant::now();
    let poll_interval = Duration::from_millis(ELEMENT_POLL_INTERVAL_MS);

    loop {
        match page.find_element(selector).await {
            Ok(element) => {
                debug!("Element `{selector}` rendered after {:?}", start.elapsed());
                return Ok(element);
            }
            Err(_) if start.elapsed() >= wait.duration() => {
                warn!(
                    "Element `{selector}` missing after {}s",
                    wait.duration().as_secs()
                );
                return Err(ExtractError::ElementTimeout {
                    selector: selector.to_string(),
                    timeout: wait.duration(),
                });
            }
            Err(_) => tokio::time::sleep(poll_interval).await,
        }
    }
}
