//! CLI command handlers. Each command is in its own file.

mod clear;
mod count;
mod delete;
mod message;
mod policy;
mod prune;
mod recent;
mod report;
mod show;

pub use clear::run_clear;
pub use count::run_count;
pub use delete::run_delete;
pub use message::run_message;
pub use policy::run_policy;
pub use prune::run_prune;
pub use recent::run_recent;
pub use report::run_report;
pub use show::run_show;

/// Render a Unix-millis timestamp in local time.
pub(crate) fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(millis)
        .map(|t| {
            t.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| millis.to_string())
}
