//! Background writer: drains the report queue into the store.

use tokio::sync::{mpsc, oneshot};

use crate::store::{ErrorStore, NewErrorRecord};

/// Work submitted by `Reporter` to the writer task.
pub(super) enum Job {
    Insert(NewErrorRecord),
    Prune { cutoff: i64 },
    Flush(oneshot::Sender<()>),
}

/// Runs until every `Reporter` clone is dropped. Failures are logged and
/// never retried here; the next report schedules another sweep.
pub(super) async fn run_writer_loop(mut jobs: mpsc::Receiver<Job>, store: ErrorStore) {
    while let Some(job) = jobs.recv().await {
        match job {
            Job::Insert(record) => match store.insert(&record).await {
                Ok(id) => tracing::trace!(id, source = %record.source, "error record persisted"),
                Err(e) => tracing::error!(
                    kind = %record.kind,
                    source = %record.source,
                    retry_count = record.retry_count,
                    message = %record.message,
                    "failed to persist error record: {}",
                    e
                ),
            },
            Job::Prune { cutoff } => match store.prune_older_than(cutoff).await {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, cutoff, "pruned expired error records"),
                Err(e) => tracing::error!(cutoff, "error log retention sweep failed: {}", e),
            },
            Job::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!("error log writer stopped");
}
