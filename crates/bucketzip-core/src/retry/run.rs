//! Retry loop: run a closure until success or policy says stop.

use super::classify;
use super::error::TransferError;
use super::policy::{RetryDecision, RetryPolicy};

/// Runs a closure until it succeeds or the retry policy says to stop.
/// On retryable failure, sleeps for the backoff duration then tries again.
/// Blocking; call from `spawn_blocking` when used from async code.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> Result<T, TransferError>
where
    F: FnMut(u32) -> Result<T, TransferError>,
{
    let mut attempt = 1u32;
    loop {
        match f(attempt) {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = classify::classify(&e);
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => return Err(e),
                    RetryDecision::RetryAfter(d) => {
                        tracing::warn!(attempt, ?kind, delay_ms = d.as_millis() as u64, "transfer failed: {}; retrying", e);
                        std::thread::sleep(d);
                        attempt += 1;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    #[test]
    fn retries_throttled_until_success() {
        let mut calls = 0;
        let out = run_with_retry(&fast_policy(5), |attempt| {
            calls += 1;
            if attempt < 3 {
                Err(TransferError::Http(503))
            } else {
                Ok(attempt)
            }
        })
        .unwrap();
        assert_eq!(out, 3);
        assert_eq!(calls, 3);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let mut calls = 0;
        let err = run_with_retry(&fast_policy(2), |_| -> Result<(), _> {
            calls += 1;
            Err(TransferError::Http(500))
        })
        .unwrap_err();
        assert!(matches!(err, TransferError::Http(500)));
        assert_eq!(calls, 2);
    }

    #[test]
    fn not_found_and_abort_are_not_retried() {
        let mut calls = 0;
        let _ = run_with_retry(&fast_policy(5), |_| -> Result<(), _> {
            calls += 1;
            Err(TransferError::Http(404))
        });
        assert_eq!(calls, 1);

        calls = 0;
        let err = run_with_retry(&fast_policy(5), |_| -> Result<(), _> {
            calls += 1;
            Err(TransferError::Aborted)
        })
        .unwrap_err();
        assert!(matches!(err, TransferError::Aborted));
        assert_eq!(calls, 1);
    }

    #[test]
    fn abort_between_attempts_ends_the_loop() {
        let abort = crate::control::AbortToken::new();
        let mut calls = 0;
        let err = run_with_retry(&fast_policy(5), |_| -> Result<(), _> {
            abort.check()?;
            calls += 1;
            abort.abort();
            Err(TransferError::Http(503))
        })
        .unwrap_err();
        assert!(matches!(err, TransferError::Aborted));
        assert_eq!(calls, 1);
    }
}
