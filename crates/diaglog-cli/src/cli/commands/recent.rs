//! `diaglog recent` – list the newest records, optionally filtered.

use anyhow::Result;
use diaglog_core::retry::ErrorKind;
use diaglog_core::store::{ErrorStore, RecordFilter};

use super::format_timestamp;

pub async fn run_recent(
    store: &ErrorStore,
    limit: u32,
    source: Option<String>,
    kind: Option<ErrorKind>,
) -> Result<()> {
    let filter = match (source, kind) {
        (Some(source), _) => RecordFilter::Source(source),
        (None, Some(kind)) => RecordFilter::Kind(kind),
        (None, None) => RecordFilter::All,
    };
    let records = store.recent(limit, &filter).await?;
    if records.is_empty() {
        println!("No error records.");
        return Ok(());
    }

    println!(
        "{:<6} {:<19} {:<8} {:<5} {:<16} {}",
        "ID", "TIME", "KIND", "RETRY", "SOURCE", "MESSAGE"
    );
    for r in records {
        println!(
            "{:<6} {:<19} {:<8} {:<5} {:<16} {}",
            r.id,
            format_timestamp(r.timestamp),
            r.kind.short_name(),
            r.retry_count,
            r.source,
            r.message.lines().next().unwrap_or_default()
        );
    }
    Ok(())
}
