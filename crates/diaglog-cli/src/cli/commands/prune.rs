//! `diaglog prune` – remove records older than the retention window.

use anyhow::Result;
use diaglog_core::store::{unix_millis, ErrorStore};

pub async fn run_prune(store: &ErrorStore, older_than_days: u64) -> Result<()> {
    let window_ms = older_than_days.saturating_mul(24 * 60 * 60 * 1000);
    let cutoff = unix_millis().saturating_sub(i64::try_from(window_ms).unwrap_or(i64::MAX));
    let removed = store.prune_older_than(cutoff).await?;
    tracing::info!(removed, older_than_days, "manual prune");
    println!("Removed {removed} record(s) older than {older_than_days} day(s)");
    Ok(())
}
