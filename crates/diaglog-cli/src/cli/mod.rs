//! CLI for inspecting and maintaining the diaglog error log.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use diaglog_core::config::{self, DiagConfig};
use diaglog_core::retry::ErrorKind;
use diaglog_core::store::ErrorStore;

use commands::{
    run_clear, run_count, run_delete, run_message, run_policy, run_prune, run_recent,
    run_report, run_show,
};

/// Top-level CLI for the diaglog error log.
#[derive(Debug, Parser)]
#[command(name = "diaglog")]
#[command(about = "diaglog: error diagnostics log and retry policy", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// List the most recent error records, newest first.
    Recent {
        /// Maximum number of records to show.
        #[arg(long, default_value = "20", value_name = "N")]
        limit: u32,
        /// Only records from this source (e.g. FeedDownload).
        #[arg(long, conflicts_with = "kind")]
        source: Option<String>,
        /// Only records of this kind (network, parse, storage, io, unknown).
        #[arg(long)]
        kind: Option<ErrorKind>,
    },

    /// Show one record in full, including its trace and context.
    Show {
        /// Record identifier.
        id: i64,
    },

    /// Delete one record by ID.
    Delete {
        /// Record identifier.
        id: i64,
    },

    /// Delete records older than the retention window.
    Prune {
        /// Override the configured retention window (days).
        #[arg(long, value_name = "DAYS")]
        older_than_days: Option<u64>,
    },

    /// Delete every record.
    Clear {
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },

    /// Print the number of stored records.
    Count,

    /// Record a failure manually (useful for testing the pipeline).
    Report {
        /// Originating component.
        #[arg(long)]
        source: String,
        /// Human-readable summary.
        #[arg(long)]
        message: String,
        /// Kind; classified from the message when omitted.
        #[arg(long)]
        kind: Option<ErrorKind>,
        /// Attempts already made for the failed operation.
        #[arg(long, default_value = "0")]
        retry_count: u32,
        /// Extra context as KEY=VALUE (repeatable; VALUE may be JSON).
        #[arg(long = "context", value_name = "KEY=VALUE")]
        context: Vec<String>,
    },

    /// Ask the retry policy about a failure.
    Policy {
        /// Kind of the failure.
        #[arg(long)]
        kind: ErrorKind,
        /// Attempts already made.
        #[arg(long, default_value = "0")]
        retry_count: u32,
        /// Retry budget (defaults to the configured max_retries).
        #[arg(long)]
        max_retries: Option<u32>,
    },

    /// Print the user-facing message for a kind.
    Message {
        /// Kind of the failure.
        #[arg(long)]
        kind: ErrorKind,
        /// Failure text used to refine network messages.
        #[arg(long)]
        cause: Option<String>,
        /// Print the localisation key instead of the English text.
        #[arg(long)]
        key: bool,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        // Pure queries never touch the database.
        match cli.command {
            CliCommand::Policy {
                kind,
                retry_count,
                max_retries,
            } => return run_policy(&cfg, kind, retry_count, max_retries),
            CliCommand::Message { kind, cause, key } => {
                return run_message(kind, cause.as_deref(), key)
            }
            command => {
                let store = open_store(&cfg).await?;
                command.run_with_store(&store, &cfg).await
            }
        }
    }

    async fn run_with_store(self, store: &ErrorStore, cfg: &DiagConfig) -> Result<()> {
        match self {
            CliCommand::Recent {
                limit,
                source,
                kind,
            } => run_recent(store, limit, source, kind).await?,
            CliCommand::Show { id } => run_show(store, id).await?,
            CliCommand::Delete { id } => run_delete(store, id).await?,
            CliCommand::Prune { older_than_days } => {
                let days = older_than_days.unwrap_or(cfg.retention_days);
                run_prune(store, days).await?;
            }
            CliCommand::Clear { yes } => run_clear(store, yes).await?,
            CliCommand::Count => run_count(store).await?,
            CliCommand::Report {
                source,
                message,
                kind,
                retry_count,
                context,
            } => run_report(store, cfg, source, message, kind, retry_count, &context).await?,
            CliCommand::Policy { .. } | CliCommand::Message { .. } => {}
        }

        Ok(())
    }
}

async fn open_store(cfg: &DiagConfig) -> Result<ErrorStore> {
    let store = match &cfg.db_path {
        Some(path) => ErrorStore::open_at(path).await?,
        None => ErrorStore::open_default().await?,
    };
    Ok(store)
}

#[cfg(test)]
mod tests;
