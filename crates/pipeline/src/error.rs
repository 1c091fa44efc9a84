use std::time::Duration;

use flashlink_gateways::GatewayError;

/// Errors surfaced by pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// An operation that requires a time slot was invoked before one
    /// was selected. Rejected before any network call.
    #[error("No time slot selected")]
    NoSlotSelected,

    /// The persistence layer failed.
    #[error("Store error: {0}")]
    Store(String),

    /// An external gateway failed.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// The affiliate cache file could not be read or written.
    #[error("Cache store error: {0}")]
    CacheStore(String),

    /// The system-status update did not complete in time.
    #[error("Status update timed out after {0:?}")]
    Timeout(Duration),
}

impl From<sqlx::Error> for PipelineError {
    fn from(e: sqlx::Error) -> Self {
        Self::Store(e.to_string())
    }
}
