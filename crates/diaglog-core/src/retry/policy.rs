//! Retry eligibility and exponential backoff.

use std::time::Duration;

use super::kind::ErrorKind;

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Exponential backoff: `base_delay * 2^retry_count`.
///
/// `max_delay` is `None` by default, so the delay keeps doubling. The
/// arithmetic saturates at `Duration::MAX` instead of overflowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay recommended before the first retry.
    pub base_delay: Duration,
    /// Optional upper bound on the recommended delay.
    pub max_delay: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(1000),
            max_delay: None,
        }
    }
}

impl RetryPolicy {
    /// Backoff for a caller that has already made `retry_count` attempts.
    pub fn delay_for(&self, retry_count: u32) -> Duration {
        let raw = scale_pow2(self.base_delay, retry_count);
        match self.max_delay {
            Some(cap) => raw.min(cap),
            None => raw,
        }
    }

    /// Combine eligibility and backoff into a single decision.
    pub fn decide(&self, kind: ErrorKind, retry_count: u32, max_retries: u32) -> RetryDecision {
        if should_retry(kind, retry_count, max_retries) {
            RetryDecision::RetryAfter(self.delay_for(retry_count))
        } else {
            RetryDecision::NoRetry
        }
    }
}

/// `base * 2^exp`, saturating at `Duration::MAX`.
fn scale_pow2(base: Duration, exp: u32) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;

    let nanos = base.as_nanos();
    if nanos == 0 {
        return Duration::ZERO;
    }
    // Every bit shifted out must be zero.
    if exp >= nanos.leading_zeros() {
        return Duration::MAX;
    }
    let scaled = nanos << exp;
    match u64::try_from(scaled / NANOS_PER_SEC) {
        Ok(secs) => Duration::new(secs, (scaled % NANOS_PER_SEC) as u32),
        Err(_) => Duration::MAX,
    }
}

/// Whether an operation that failed with `kind` after `retry_count` prior
/// attempts should be tried again.
///
/// Never true once `retry_count >= max_retries`.
pub fn should_retry(kind: ErrorKind, retry_count: u32, max_retries: u32) -> bool {
    if retry_count >= max_retries {
        return false;
    }

    match kind {
        // Transient by assumption.
        ErrorKind::Network => true,
        // Repeated storage/IO failures are rarely transient.
        ErrorKind::Io | ErrorKind::Storage => retry_count < 2,
        // Malformed input will not fix itself.
        ErrorKind::Parse => false,
        ErrorKind::Unknown => retry_count < 1,
    }
}

/// Backoff with the default policy: 1s, 2s, 4s, 8s, ...
pub fn next_delay(retry_count: u32) -> Duration {
    RetryPolicy::default().delay_for(retry_count)
}
