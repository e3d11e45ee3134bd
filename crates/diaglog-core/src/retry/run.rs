//! Caller-side retry loop: run an operation until success or the policy says stop.

use std::error::Error;
use std::future::Future;

use super::classify;
use super::policy::RetryDecision;
use crate::reporter::{ErrorReport, Reporter};

/// Runs `op` until it succeeds or the retry policy says to stop.
///
/// `op` receives the number of attempts already made. Every failure is
/// reported under `source` with that count; on a retryable failure the
/// loop sleeps for the advised backoff and tries again. The last error is
/// returned once retries are exhausted or the kind is not retryable.
pub async fn run_with_retry<T, E, F, Fut>(
    reporter: &Reporter,
    source: &str,
    max_retries: u32,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Error + 'static,
{
    let mut retry_count = 0u32;
    loop {
        match op(retry_count).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                let kind = classify(&e);
                reporter.report(
                    ErrorReport::from_error(source, &e)
                        .kind(kind)
                        .retry_count(retry_count),
                );
                match reporter.decide(kind, retry_count, max_retries) {
                    RetryDecision::NoRetry => return Err(e),
                    RetryDecision::RetryAfter(delay) => {
                        tracing::debug!(
                            source,
                            retry_count,
                            delay_ms = delay.as_millis() as u64,
                            "retrying after backoff"
                        );
                        tokio::time::sleep(delay).await;
                        retry_count += 1;
                    }
                }
            }
        }
    }
}
