//! SQLite-backed error-log store: connection, migrations, count publishing.
//!
//! Record reads and writes live in `records`.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite, SqliteConnection};
use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::{watch, Mutex};

use super::StoreError;

/// Percent-encode a path for use in a sqlite:// URI so spaces and special chars don't break parsing.
fn path_to_sqlite_uri(path: &Path) -> String {
    let s = path.to_string_lossy();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '&' => out.push_str("%26"),
            c => out.push(c),
        }
    }
    format!("sqlite://{}", out)
}

/// Handle to the SQLite-backed error log.
///
/// The database file is stored under the XDG state directory:
/// `~/.local/state/diaglog/errors.db` on Debian.
///
/// Cloning is cheap; clones share the pool, the write lock and the count
/// channel. Mutations are serialised through the write lock so that the
/// published count follows commit order.
#[derive(Clone)]
pub struct ErrorStore {
    pub(crate) pool: Pool<Sqlite>,
    pub(crate) write_lock: Arc<Mutex<()>>,
    pub(crate) count_tx: Arc<watch::Sender<u64>>,
}

impl ErrorStore {
    /// Open (or create) the default error log and run migrations.
    pub async fn open_default() -> Result<Self, StoreError> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("diaglog")?;
        let db_path = xdg_dirs.get_state_home().join("errors.db");
        Self::open_at(db_path).await
    }

    /// Open (or create) the error log at a specific path. Creates parent dirs if needed.
    pub async fn open_at(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let uri = path_to_sqlite_uri(path) + "?mode=rwc";
        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect(&uri)
            .await?;
        Self::from_pool(pool).await
    }

    pub(crate) async fn from_pool(pool: Pool<Sqlite>) -> Result<Self, StoreError> {
        migrate(&pool).await?;
        let mut conn = pool.acquire().await?;
        let initial = count_rows(&mut conn).await?;
        drop(conn);
        let (count_tx, _) = watch::channel(initial);
        Ok(ErrorStore {
            pool,
            write_lock: Arc::new(Mutex::new(())),
            count_tx: Arc::new(count_tx),
        })
    }

    /// Publish a committed count. Called with the write lock held.
    pub(crate) fn publish_count(&self, count: u64) {
        self.count_tx.send_replace(count);
    }
}

async fn migrate(pool: &Pool<Sqlite>) -> Result<(), StoreError> {
    // One append-only table. `context_json` holds the optional key/value
    // payload as a JSON object; `timestamp` is Unix milliseconds.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS error_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            kind TEXT NOT NULL,
            message TEXT NOT NULL,
            trace TEXT,
            source TEXT NOT NULL,
            timestamp INTEGER NOT NULL,
            retry_count INTEGER NOT NULL DEFAULT 0,
            context_json TEXT
        );
        "#,
    )
    .execute(pool)
    .await?;

    for stmt in [
        "CREATE INDEX IF NOT EXISTS idx_error_log_timestamp ON error_log (timestamp)",
        "CREATE INDEX IF NOT EXISTS idx_error_log_source ON error_log (source, timestamp)",
        "CREATE INDEX IF NOT EXISTS idx_error_log_kind ON error_log (kind, timestamp)",
    ] {
        sqlx::query(stmt).execute(pool).await?;
    }

    Ok(())
}

/// Total number of rows, read on the given connection (or transaction).
pub(crate) async fn count_rows(conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM error_log")
        .fetch_one(&mut *conn)
        .await?;
    Ok(u64::try_from(n).unwrap_or_default())
}

/// Current time as Unix milliseconds (record timestamps and prune cutoffs).
pub fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

#[cfg(test)]
/// Open an in-memory store for tests (no disk I/O).
pub(crate) async fn open_memory() -> Result<ErrorStore, StoreError> {
    // Single connection to avoid in-memory pool handing back a different empty DB.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    ErrorStore::from_pool(pool).await
}
