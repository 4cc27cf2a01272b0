//! Progress events for a harvest run: archive counts and bytes of the current download.
//!
//! The pipeline sends these over a bounded `tokio::sync::mpsc` channel with
//! `try_send`, so a slow consumer drops byte updates instead of stalling curl.

use tokio::sync::mpsc::Sender;

/// Byte progress of the archive currently downloading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteProgress {
    pub done: u64,
    /// Content-Length once known.
    pub total: Option<u64>,
}

impl ByteProgress {
    /// Fraction complete in [0.0, 1.0], or `None` without a Content-Length.
    pub fn fraction(&self) -> Option<f64> {
        match self.total {
            Some(0) => Some(1.0),
            Some(t) => Some((self.done as f64 / t as f64).min(1.0)),
            None => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.total, Some(t) if self.done >= t)
    }
}

/// One step of a harvest. `index` is 0-based; `count` is the number of archives listed.
#[derive(Debug, Clone, PartialEq)]
pub enum HarvestProgress {
    Listed { count: usize },
    Downloading { index: usize, count: usize, name: String },
    Bytes { index: usize, count: usize, bytes: ByteProgress },
    Extracted { index: usize, count: usize, name: String, files: u64 },
}

/// Send without waiting; drops the event when the channel is full or closed.
pub(crate) fn emit(tx: Option<&Sender<HarvestProgress>>, event: HarvestProgress) {
    if let Some(tx) = tx {
        let _ = tx.try_send(event);
    }
}
