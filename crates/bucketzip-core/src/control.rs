//! Run control: a shared abort flag that stops a harvest between archives or mid-transfer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Error returned when a harvest is stopped by the user (Ctrl-C).
#[derive(Debug, thiserror::Error)]
#[error("harvest aborted by user")]
pub struct Aborted;

/// Cloneable abort flag. Curl callbacks poll it, so it must stay cheap to read.
#[derive(Debug, Clone, Default)]
pub struct AbortToken(Arc<AtomicBool>);

impl AbortToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the running harvest stop.
    pub fn abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// `Err(Aborted)` once `abort` has been called.
    pub fn check(&self) -> Result<(), Aborted> {
        if self.is_aborted() {
            Err(Aborted)
        } else {
            Ok(())
        }
    }
}
