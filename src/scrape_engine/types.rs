//! Outcome and failure types shared by the engine layers

use std::fmt;

use crate::page_extractor::ExtractError;
use crate::session::SessionError;

/// Coarse cause of a failed attempt, used for logging only
///
/// The engine never branches on this: every failure gets the same single
/// retry. The classification exists so operators can tell a dead network
/// from a page layout change when reading the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Navigation rejected or the page failed to load
    Navigation,
    /// Any deadline: page load, element wait, script
    Timeout,
    /// The page loaded but did not have the expected structure
    Content,
    /// The browser itself is gone
    SessionLost,
    /// CDP or script failures that fit nowhere else
    Browser,
}

impl FailureKind {
    #[must_use]
    pub fn classify(error: &ExtractError) -> Self {
        match error {
            ExtractError::ElementTimeout { .. } => Self::Timeout,
            ExtractError::MalformedElement { .. } | ExtractError::UnexpectedContent(_) => {
                Self::Content
            }
            ExtractError::Script(_) => Self::Browser,
            ExtractError::Session(session) => Self::classify_session(session),
        }
    }

    #[must_use]
    pub fn classify_session(error: &SessionError) -> Self {
        match error {
            SessionError::Navigation { .. } => Self::Navigation,
            SessionError::Timeout { .. } => Self::Timeout,
            SessionError::Closed(_) => Self::SessionLost,
            SessionError::Protocol(_) => Self::Browser,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Navigation => "navigation",
            Self::Timeout => "timeout",
            Self::Content => "content",
            Self::SessionLost => "session lost",
            Self::Browser => "browser",
        };
        f.write_str(label)
    }
}

/// Opaque failure of one scrape attempt
#[derive(Debug, Clone, thiserror::Error)]
#[error("scrape of {item} failed ({kind}): {message}")]
pub struct ScrapeFailure {
    pub item: String,
    pub kind: FailureKind,
    pub message: String,
}

impl ScrapeFailure {
    pub(crate) fn new(item: impl fmt::Display, error: &ExtractError) -> Self {
        Self {
            item: item.to_string(),
            kind: FailureKind::classify(error),
            message: error.to_string(),
        }
    }
}

/// Result of the retry controller for one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome<R> {
    /// Records from whichever attempt succeeded
    Scraped(Vec<R>),
    /// Both attempts failed
    Failed,
}

impl<R> ItemOutcome<R> {
    #[must_use]
    pub fn is_scraped(&self) -> bool {
        matches!(self, Self::Scraped(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn element_waits_classify_as_timeouts() {
        let err = ExtractError::ElementTimeout {
            selector: "#live-incidents".into(),
            timeout: Duration::from_secs(15),
        };
        assert_eq!(FailureKind::classify(&err), FailureKind::Timeout);
    }

    #[test]
    fn session_errors_keep_their_cause() {
        let closed = ExtractError::from(SessionError::Closed("gone".into()));
        assert_eq!(FailureKind::classify(&closed), FailureKind::SessionLost);

        let nav = ExtractError::from(SessionError::Navigation {
            url: "https://example.com".into(),
            message: "net::ERR_NAME_NOT_RESOLVED".into(),
        });
        assert_eq!(FailureKind::classify(&nav), FailureKind::Navigation);
    }

    #[test]
    fn failure_message_names_item_and_kind() {
        let err = ExtractError::UnexpectedContent("login wall".into());
        let failure = ScrapeFailure::new("https://example.com/matches/1", &err);
        let text = failure.to_string();
        assert!(text.contains("https://example.com/matches/1"));
        assert!(text.contains("(content)"));
        assert!(text.contains("login wall"));
    }
}
