//! Persistent error log (SQLite via sqlx).
//!
//! Append-only table of diagnostic records with bounded, filtered reads,
//! age-based pruning, single-record and bulk deletion, and a live count.

mod db;
mod error;
mod records;
mod types;

pub use db::{unix_millis, ErrorStore};
pub use error::StoreError;
pub use types::{ErrorRecord, NewErrorRecord, RecordContext, RecordFilter, RecordId};

#[cfg(test)]
pub(crate) use db::open_memory;

#[cfg(test)]
mod tests;
