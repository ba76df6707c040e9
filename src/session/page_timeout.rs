//! Timeout wrapper for page operations
//!
//! CDP calls can hang forever on a wedged renderer. Every navigation goes
//! through [`with_page_timeout`] so a stuck page surfaces as a typed
//! [`SessionError::Timeout`] instead of stalling the run.

use std::future::Future;
use std::time::Duration;

use super::SessionError;

/// Run `operation` with a deadline
///
/// # Errors
///
/// Returns the operation's own error, or [`SessionError::Timeout`] naming
/// `operation_name` when the deadline passes first.
pub async fn with_page_timeout<F, T>(
    operation: F,
    timeout: Duration,
    operation_name: &str,
) -> Result<T, SessionError>
where
    F: Future<Output = Result<T, SessionError>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(SessionError::Timeout {
            operation: operation_name.to_string(),
            timeout,
        }),
    }
}
