//! Record write operations: insert, delete, prune, clear.
//!
//! Every mutation runs in a transaction under the store's write lock, reads
//! the new total inside that transaction, and publishes it after commit.

use crate::store::db::{count_rows, ErrorStore};
use crate::store::types::{NewErrorRecord, RecordId};
use crate::store::StoreError;

impl ErrorStore {
    /// Persist a new record and return its store-assigned id.
    pub async fn insert(&self, record: &NewErrorRecord) -> Result<RecordId, StoreError> {
        record.validate()?;
        let context_json = record
            .context
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;
        let id = sqlx::query(
            r#"
            INSERT INTO error_log (
                kind, message, trace, source, timestamp, retry_count, context_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(record.kind.as_str())
        .bind(&record.message)
        .bind(record.trace.as_deref())
        .bind(&record.source)
        .bind(record.timestamp)
        .bind(i64::from(record.retry_count))
        .bind(context_json)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
        let count = count_rows(&mut tx).await?;
        tx.commit().await?;
        self.publish_count(count);

        Ok(id)
    }

    /// Remove one record. Returns the number of rows removed (0 or 1).
    pub async fn delete_by_id(&self, id: RecordId) -> Result<u64, StoreError> {
        self.delete_where("DELETE FROM error_log WHERE id = ?1", Some(id))
            .await
    }

    /// Remove every record with `timestamp < cutoff` (Unix millis).
    ///
    /// Idempotent: a second call with the same cutoff removes nothing.
    pub async fn prune_older_than(&self, cutoff: i64) -> Result<u64, StoreError> {
        self.delete_where("DELETE FROM error_log WHERE timestamp < ?1", Some(cutoff))
            .await
    }

    /// Remove every record.
    pub async fn clear_all(&self) -> Result<u64, StoreError> {
        self.delete_where("DELETE FROM error_log", None).await
    }

    async fn delete_where(&self, sql: &str, arg: Option<i64>) -> Result<u64, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;
        let mut query = sqlx::query(sql);
        if let Some(arg) = arg {
            query = query.bind(arg);
        }
        let removed = query.execute(&mut *tx).await?.rows_affected();
        if removed == 0 {
            tx.commit().await?;
            return Ok(0);
        }
        let count = count_rows(&mut tx).await?;
        tx.commit().await?;
        self.publish_count(count);

        Ok(removed)
    }
}
