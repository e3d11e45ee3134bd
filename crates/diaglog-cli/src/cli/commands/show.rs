//! `diaglog show <id>` – print one record in full.

use anyhow::{bail, Result};
use diaglog_core::reporter::user_facing_message;
use diaglog_core::store::ErrorStore;

use super::format_timestamp;

pub async fn run_show(store: &ErrorStore, id: i64) -> Result<()> {
    let Some(r) = store.get_by_id(id).await? else {
        bail!("no error record with id {id}");
    };

    println!("id:          {}", r.id);
    println!("time:        {}", format_timestamp(r.timestamp));
    println!("kind:        {}", r.kind.as_str());
    println!("source:      {}", r.source);
    println!("retry count: {}", r.retry_count);
    println!("message:     {}", r.message);
    println!(
        "user sees:   {}",
        user_facing_message(r.kind, Some(r.trace.as_deref().unwrap_or(&r.message)))
    );
    if let Some(ctx) = &r.context {
        println!("context:     {}", serde_json::to_string_pretty(ctx)?);
    }
    if let Some(trace) = &r.trace {
        println!("trace:\n{trace}");
    }
    Ok(())
}
