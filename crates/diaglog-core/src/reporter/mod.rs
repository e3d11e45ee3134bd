//! Diagnostics reporter: record failures without blocking the caller.
//!
//! `Reporter::report` builds an immutable record, logs it at error level,
//! and queues it for a background writer together with a retention sweep.
//! Nothing in this path returns an error to, or panics in, the caller.

mod message;
mod report;
mod worker;

pub use message::{user_facing_message, user_facing_message_for, UserMessage};
pub use report::{format_trace, ErrorReport, UNSPECIFIED_SOURCE};

use std::error::Error;
use std::time::Duration;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};

use crate::retry::{self, ErrorKind, RetryDecision, RetryPolicy};
use crate::store::{unix_millis, ErrorStore};
use worker::Job;

/// Default age after which records are pruned.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Reporter settings. Built from `DiagConfig::reporter_config`.
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// Records older than this are removed by the sweep after each report.
    pub retention: Duration,
    /// Jobs that can wait for the writer before new reports are dropped.
    pub queue_capacity: usize,
    /// Backoff used by `next_delay` and `decide`.
    pub retry: RetryPolicy,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            retention: DEFAULT_RETENTION,
            queue_capacity: 256,
            retry: RetryPolicy::default(),
        }
    }
}

/// Handle for reporting failures. Cheap to clone; all clones feed the same
/// background writer, which stops once the last clone is dropped.
#[derive(Clone)]
pub struct Reporter {
    jobs: mpsc::Sender<Job>,
    store: ErrorStore,
    config: ReporterConfig,
}

impl Reporter {
    /// Start the background writer for `store`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(store: ErrorStore, config: ReporterConfig) -> Self {
        let (jobs, rx) = mpsc::channel(config.queue_capacity.max(1));
        tokio::spawn(worker::run_writer_loop(rx, store.clone()));
        Self {
            jobs,
            store,
            config,
        }
    }

    /// Record a failure. Returns immediately; persistence and the
    /// retention sweep happen on the writer task.
    pub fn report(&self, report: ErrorReport) {
        let now = unix_millis();
        let record = report.into_record(now);

        tracing::error!(
            kind = %record.kind,
            source = %record.source,
            retry_count = record.retry_count,
            "{}",
            record.message
        );

        self.submit(Job::Insert(record));
        self.submit(Job::Prune {
            cutoff: self.retention_cutoff(now),
        });
    }

    /// Record a raw error under `source`, classifying it.
    pub fn report_error(&self, source: &str, err: &(dyn Error + 'static), retry_count: u32) {
        self.report(ErrorReport::from_error(source, err).retry_count(retry_count));
    }

    /// Wait until every job queued before this call has been processed.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.jobs.send(Job::Flush(done_tx)).await.is_err() {
            return;
        }
        let _ = done_rx.await;
    }

    pub fn store(&self) -> &ErrorStore {
        &self.store
    }

    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    pub fn should_retry(&self, kind: ErrorKind, retry_count: u32, max_retries: u32) -> bool {
        retry::should_retry(kind, retry_count, max_retries)
    }

    pub fn next_delay(&self, retry_count: u32) -> Duration {
        self.config.retry.delay_for(retry_count)
    }

    pub fn decide(&self, kind: ErrorKind, retry_count: u32, max_retries: u32) -> RetryDecision {
        self.config.retry.decide(kind, retry_count, max_retries)
    }

    pub fn user_facing_message(
        &self,
        kind: ErrorKind,
        cause: Option<&(dyn Error + 'static)>,
    ) -> UserMessage {
        user_facing_message_for(kind, cause)
    }

    /// Timestamp (Unix millis) before which records are expired.
    pub fn retention_cutoff(&self, now: i64) -> i64 {
        let window = i64::try_from(self.config.retention.as_millis()).unwrap_or(i64::MAX);
        now.saturating_sub(window)
    }

    fn submit(&self, job: Job) {
        let (reason, job) = match self.jobs.try_send(job) {
            Ok(()) => return,
            Err(TrySendError::Full(job)) => ("queue full", job),
            Err(TrySendError::Closed(job)) => ("writer stopped", job),
        };
        match job {
            Job::Insert(record) => tracing::error!(
                kind = %record.kind,
                source = %record.source,
                retry_count = record.retry_count,
                message = %record.message,
                "dropping error record ({})",
                reason
            ),
            Job::Prune { cutoff } => {
                tracing::error!(cutoff, "dropping retention sweep ({})", reason)
            }
            Job::Flush(_) => {}
        }
    }
}
