//! `diaglog delete <id>` – remove one record.

use anyhow::Result;
use diaglog_core::store::ErrorStore;

pub async fn run_delete(store: &ErrorStore, id: i64) -> Result<()> {
    match store.delete_by_id(id).await? {
        0 => println!("No error record with id {id}"),
        _ => println!("Deleted error record {id}"),
    }
    Ok(())
}
