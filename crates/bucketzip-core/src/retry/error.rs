//! Transfer error type for retry classification.

use thiserror::Error;

/// Error returned by a single HTTP transfer (listing page or archive body).
/// Kept typed so the retry policy can classify it before it becomes an `anyhow::Error`.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error(transparent)]
    Curl(#[from] curl::Error),
    /// Server answered with a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Writing the body to disk failed (disk full, permission denied). Not retried.
    #[error("storage: {0}")]
    Storage(#[source] std::io::Error),
    /// The abort token was set while the transfer was running.
    #[error("transfer aborted by user")]
    Aborted,
}

impl From<crate::control::Aborted> for TransferError {
    fn from(_: crate::control::Aborted) -> Self {
        TransferError::Aborted
    }
}
