//! `diaglog clear --yes` – remove every record.

use anyhow::{bail, Result};
use diaglog_core::store::ErrorStore;

pub async fn run_clear(store: &ErrorStore, yes: bool) -> Result<()> {
    if !yes {
        bail!("refusing to delete all error records without --yes");
    }
    let removed = store.clear_all().await?;
    tracing::info!(removed, "error log cleared");
    println!("Removed {removed} record(s)");
    Ok(())
}
