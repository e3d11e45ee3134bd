//! Types used by the error-log store.

use crate::retry::ErrorKind;

/// Store-assigned record identifier.
pub type RecordId = i64;

/// Structured side-channel payload, persisted as a JSON object.
pub type RecordContext = serde_json::Map<String, serde_json::Value>;

/// A diagnostic entry that has not been persisted yet.
///
/// Built by the reporter at the moment of failure; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewErrorRecord {
    pub kind: ErrorKind,
    pub message: String,
    /// Formatted cause chain, absent when no cause was given.
    pub trace: Option<String>,
    /// Originating component, e.g. `FeedDownload` or `TorrentEngine`.
    pub source: String,
    /// Creation time in Unix milliseconds.
    pub timestamp: i64,
    /// Attempts already made for the failed operation.
    pub retry_count: u32,
    pub context: Option<RecordContext>,
}

impl NewErrorRecord {
    pub(crate) fn validate(&self) -> Result<(), super::StoreError> {
        if self.message.trim().is_empty() {
            return Err(super::StoreError::InvalidRecord("message must not be empty"));
        }
        if self.source.trim().is_empty() {
            return Err(super::StoreError::InvalidRecord("source must not be empty"));
        }
        Ok(())
    }
}

/// A persisted diagnostic entry. Never updated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRecord {
    pub id: RecordId,
    pub kind: ErrorKind,
    pub message: String,
    pub trace: Option<String>,
    pub source: String,
    pub timestamp: i64,
    pub retry_count: u32,
    pub context: Option<RecordContext>,
}

impl ErrorRecord {
    /// The record's content without its identity.
    pub fn content(&self) -> NewErrorRecord {
        NewErrorRecord {
            kind: self.kind,
            message: self.message.clone(),
            trace: self.trace.clone(),
            source: self.source.clone(),
            timestamp: self.timestamp,
            retry_count: self.retry_count,
            context: self.context.clone(),
        }
    }
}

/// Optional filter for `recent`. At most one criterion applies per query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecordFilter {
    #[default]
    All,
    Source(String),
    Kind(ErrorKind),
}
