//! Record read operations: recent, get, count, count observation.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::retry::ErrorKind;
use crate::store::db::{count_rows, ErrorStore};
use crate::store::types::{ErrorRecord, RecordContext, RecordFilter, RecordId};
use crate::store::StoreError;

const SELECT_COLUMNS: &str =
    "SELECT id, kind, message, trace, source, timestamp, retry_count, context_json FROM error_log";

impl ErrorStore {
    /// Most recent records first (by timestamp, then id), at most `limit`.
    pub async fn recent(
        &self,
        limit: u32,
        filter: &RecordFilter,
    ) -> Result<Vec<ErrorRecord>, StoreError> {
        let limit = i64::from(limit);
        let rows = match filter {
            RecordFilter::All => {
                let sql =
                    format!("{SELECT_COLUMNS} ORDER BY timestamp DESC, id DESC LIMIT ?1");
                sqlx::query(&sql).bind(limit).fetch_all(&self.pool).await?
            }
            RecordFilter::Source(source) => {
                let sql = format!(
                    "{SELECT_COLUMNS} WHERE source = ?1 ORDER BY timestamp DESC, id DESC LIMIT ?2"
                );
                sqlx::query(&sql)
                    .bind(source)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
            }
            RecordFilter::Kind(kind) => {
                let sql = format!(
                    "{SELECT_COLUMNS} WHERE kind IN (?1, ?2) ORDER BY timestamp DESC, id DESC LIMIT ?3"
                );
                sqlx::query(&sql)
                    .bind(kind.as_str())
                    .bind(kind.legacy_name().unwrap_or(kind.as_str()))
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows.iter().map(record_from_row).collect())
    }

    /// Fetch one record, or `None` if it does not exist (or was pruned).
    pub async fn get_by_id(&self, id: RecordId) -> Result<Option<ErrorRecord>, StoreError> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(record_from_row))
    }

    /// Total number of records, read directly from the table.
    pub async fn count(&self) -> Result<u64, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(count_rows(&mut conn).await?)
    }

    /// Subscribe to the live record count. The receiver starts at the last
    /// committed value and changes only after a commit that changed it.
    pub fn watch_count(&self) -> watch::Receiver<u64> {
        self.count_tx.subscribe()
    }

    /// The live record count as a stream: yields the current value, then
    /// each newly committed one. Slow consumers see the latest value.
    pub fn count_stream(&self) -> WatchStream<u64> {
        WatchStream::new(self.watch_count())
    }
}

fn record_from_row(row: &SqliteRow) -> ErrorRecord {
    let id: i64 = row.get("id");
    let kind_str: String = row.get("kind");
    let retry_count: i64 = row.get("retry_count");
    let context_json: Option<String> = row.get("context_json");

    let context = context_json
        .as_deref()
        .filter(|s| !s.is_empty())
        .and_then(|s| match serde_json::from_str::<RecordContext>(s) {
            Ok(ctx) => Some(ctx),
            Err(e) => {
                tracing::warn!(id, "ignoring malformed record context: {}", e);
                None
            }
        });

    ErrorRecord {
        id,
        kind: ErrorKind::from_stored(&kind_str),
        message: row.get("message"),
        trace: row.get("trace"),
        source: row.get("source"),
        timestamp: row.get("timestamp"),
        retry_count: u32::try_from(retry_count).unwrap_or_default(),
        context,
    }
}
