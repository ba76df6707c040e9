//! Page extraction seam
//!
//! A [`PageExtractor`] turns the page a session has loaded into records. The
//! engine treats it as opaque: it either returns records or fails, and any
//! failure is retried the same way regardless of cause.

pub mod js_scripts;
pub mod rendered;

use std::time::Duration;

use async_trait::async_trait;

use crate::session::{BrowserSession, SessionError};
use crate::work_item::WorkItem;

pub use rendered::{PageSnapshot, RenderedPageExtractor};

/// Errors raised while extracting records from a loaded page
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExtractError {
    /// A required element never rendered
    #[error("element `{selector}` did not render within {} seconds", timeout.as_secs())]
    ElementTimeout { selector: String, timeout: Duration },

    /// An element rendered but did not have the expected shape
    #[error("element `{selector}` is malformed: {detail}")]
    MalformedElement { selector: String, detail: String },

    /// The page itself is not the page the item asked for
    #[error("unexpected page content: {0}")]
    UnexpectedContent(String),

    /// In-page script evaluation failed
    #[error("script evaluation failed: {0}")]
    Script(String),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Extracts records for one work item from the page a session has loaded
///
/// Implementations are paired with a concrete session type `S` because they
/// need that session's DOM access. They must not assume anything about
/// previous items beyond what the session's current page shows.
#[async_trait]
pub trait PageExtractor<S: BrowserSession>: Send + Sync {
    type Item: WorkItem;
    type Record: Send;

    /// Extract records for `item` from the page currently loaded in `session`
    ///
    /// An empty vector is a success: the page exists but carries no rows.
    async fn extract(
        &self,
        session: &mut S,
        item: &Self::Item,
    ) -> Result<Vec<Self::Record>, ExtractError>;
}
