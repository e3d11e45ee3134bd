//! Store error type.

/// Failure of an error-log store operation.
///
/// Returned to direct callers of the store (CLI, admin surfaces). The
/// reporter never lets these reach the code that reported a failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("could not serialize record context: {0}")]
    Context(#[from] serde_json::Error),
    #[error("could not prepare state directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not locate XDG directories: {0}")]
    Xdg(#[from] xdg::BaseDirectoriesError),
    #[error("invalid record: {0}")]
    InvalidRecord(&'static str),
}
