//! Error diagnostics log and retry policy.
//!
//! - [`retry`]: classify failures into a closed set of kinds and advise on
//!   retries and backoff.
//! - [`store`]: persistent, queryable, self-pruning log of error records.
//! - [`reporter`]: non-blocking front door that records failures, sweeps
//!   expired records, and maps kinds to user-facing messages.

pub mod config;
pub mod logging;

pub mod reporter;
pub mod retry;
pub mod store;

pub use reporter::{ErrorReport, Reporter, ReporterConfig, UserMessage};
pub use retry::{classify, next_delay, should_retry, ErrorKind, RetryDecision, RetryPolicy};
pub use store::{ErrorRecord, ErrorStore, NewErrorRecord, RecordFilter, RecordId, StoreError};
