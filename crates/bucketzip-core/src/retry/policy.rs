use std::time::Duration;

/// High-level classification of an error for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out (connect/read).
    Timeout,
    /// Server asked us to slow down (429, 503). S3 answers `SlowDown` with 503.
    Throttled,
    /// Network-level failure (connection reset, DNS, short body).
    Connection,
    /// Retryable 5xx that is not throttling.
    Http5xx(u16),
    /// Anything else; not retried.
    Other,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Exponential backoff with an attempt cap and a delay ceiling.
///
/// Built from the `[retry]` table of `config.toml` via
/// [`HarvestConfig::retry_policy`](crate::config::HarvestConfig::retry_policy).
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    pub base_delay: Duration,
    /// Upper bound on backoff delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// `attempt` is 1-based (1 = first attempt). Returns `NoRetry` when we should stop.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }

        match kind {
            ErrorKind::Other => RetryDecision::NoRetry,
            ErrorKind::Timeout
            | ErrorKind::Connection
            | ErrorKind::Throttled
            | ErrorKind::Http5xx(_) => {
                // base * 2^(attempt-1), exponent capped at 8, then clamped to max_delay.
                let exp = 1u32 << attempt.saturating_sub(1).min(8);
                let delay = self.base_delay.saturating_mul(exp).min(self.max_delay);
                RetryDecision::RetryAfter(delay)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delay(p: &RetryPolicy, attempt: u32, kind: ErrorKind) -> Duration {
        match p.decide(attempt, kind) {
            RetryDecision::RetryAfter(d) => d,
            RetryDecision::NoRetry => panic!("expected retry at attempt {}", attempt),
        }
    }

    #[test]
    fn no_retry_for_other() {
        let p = RetryPolicy::default();
        assert_eq!(p.decide(1, ErrorKind::Other), RetryDecision::NoRetry);
    }

    #[test]
    fn backoff_doubles_then_caps() {
        let p = RetryPolicy {
            max_attempts: 20,
            ..RetryPolicy::default()
        };
        assert_eq!(delay(&p, 1, ErrorKind::Timeout), Duration::from_millis(250));
        assert_eq!(delay(&p, 2, ErrorKind::Timeout), Duration::from_millis(500));
        assert_eq!(delay(&p, 3, ErrorKind::Connection), Duration::from_secs(1));
        assert_eq!(delay(&p, 15, ErrorKind::Http5xx(502)), p.max_delay);
    }

    #[test]
    fn respects_max_attempts() {
        let p = RetryPolicy {
            max_attempts: 3,
            ..RetryPolicy::default()
        };
        assert!(matches!(
            p.decide(2, ErrorKind::Throttled),
            RetryDecision::RetryAfter(_)
        ));
        assert_eq!(p.decide(3, ErrorKind::Throttled), RetryDecision::NoRetry);
        assert_eq!(
            RetryPolicy::no_retry().decide(1, ErrorKind::Timeout),
            RetryDecision::NoRetry
        );
    }
}
