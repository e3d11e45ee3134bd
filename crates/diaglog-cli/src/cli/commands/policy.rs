//! `diaglog policy` – ask whether a failure should be retried, and when.

use anyhow::Result;
use diaglog_core::config::DiagConfig;
use diaglog_core::retry::{ErrorKind, RetryDecision};

pub fn run_policy(
    cfg: &DiagConfig,
    kind: ErrorKind,
    retry_count: u32,
    max_retries: Option<u32>,
) -> Result<()> {
    let max_retries = max_retries.unwrap_or(cfg.max_retries);
    match cfg.retry_policy().decide(kind, retry_count, max_retries) {
        RetryDecision::RetryAfter(delay) => {
            println!(
                "retry: yes (attempt {} of {}), wait {} ms",
                retry_count + 1,
                max_retries,
                delay.as_millis()
            );
        }
        RetryDecision::NoRetry => println!("retry: no"),
    }
    Ok(())
}
