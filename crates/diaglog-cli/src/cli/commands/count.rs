//! `diaglog count` – print the number of stored records.

use anyhow::Result;
use diaglog_core::store::ErrorStore;

pub async fn run_count(store: &ErrorStore) -> Result<()> {
    println!("{}", store.count().await?);
    Ok(())
}
