//! Failure classification and retry/backoff policy.
//!
//! This module maps raised failures into a closed set of kinds and
//! advises callers whether (and after how long) to retry. It never drives
//! retries itself; `run_with_retry` is the caller-side loop packaged for
//! convenience.

mod classify;
mod kind;
mod policy;
mod run;

pub use classify::{classify, classify_anyhow, classify_io_error, classify_message};
pub use kind::{ErrorKind, UnknownKindName};
pub use policy::{next_delay, should_retry, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
