//! `diaglog report` – record a failure through the reporter pipeline.

use anyhow::{bail, Result};
use diaglog_core::config::DiagConfig;
use diaglog_core::reporter::{ErrorReport, Reporter};
use diaglog_core::retry::ErrorKind;
use diaglog_core::store::ErrorStore;

pub async fn run_report(
    store: &ErrorStore,
    cfg: &DiagConfig,
    source: String,
    message: String,
    kind: Option<ErrorKind>,
    retry_count: u32,
    context: &[String],
) -> Result<()> {
    let mut report = ErrorReport::new(source, message).retry_count(retry_count);
    if let Some(kind) = kind {
        report = report.kind(kind);
    }
    for pair in context {
        let (key, value) = parse_context_pair(pair)?;
        report = report.context_field(key, value);
    }
    let kind = report.resolved_kind();

    let reporter = Reporter::spawn(store.clone(), cfg.reporter_config());
    reporter.report(report);
    // Make sure the writer finished before the process exits.
    reporter.flush().await;

    println!(
        "Reported {} error (retry {} of {}: {})",
        kind.short_name(),
        retry_count,
        cfg.max_retries,
        if reporter.should_retry(kind, retry_count, cfg.max_retries) {
            "retryable"
        } else {
            "exhausted"
        }
    );
    Ok(())
}

/// Split `KEY=VALUE`; VALUE is parsed as JSON when possible, else kept as a string.
pub(crate) fn parse_context_pair(pair: &str) -> Result<(String, serde_json::Value)> {
    let Some((key, value)) = pair.split_once('=') else {
        bail!("context must be KEY=VALUE, got '{pair}'");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("context key must not be empty in '{pair}'");
    }
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
