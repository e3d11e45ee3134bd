//! Tests for the error-log store (in-memory DB helper from db).

use super::open_memory;
use super::{NewErrorRecord, RecordContext, RecordFilter, StoreError};
use crate::retry::ErrorKind;

fn record(source: &str, kind: ErrorKind, timestamp: i64) -> NewErrorRecord {
    NewErrorRecord {
        kind,
        message: format!("{source} failed"),
        trace: None,
        source: source.to_string(),
        timestamp,
        retry_count: 0,
        context: None,
    }
}

#[tokio::test]
async fn insert_then_get_roundtrip() {
    let store = open_memory().await.unwrap();
    let mut ctx = RecordContext::new();
    ctx.insert("url".into(), "https://example.com/feed.xml".into());
    ctx.insert("status".into(), 503.into());
    let new = NewErrorRecord {
        kind: ErrorKind::Network,
        message: "feed fetch failed".to_string(),
        trace: Some("timed out\n\nCaused by:\n    0: os error 110".to_string()),
        source: "FeedDownload".to_string(),
        timestamp: 1_700_000_000_123,
        retry_count: 2,
        context: Some(ctx),
    };
    let id = store.insert(&new).await.unwrap();

    let got = store.get_by_id(id).await.unwrap().expect("record exists");
    assert_eq!(got.id, id);
    assert_eq!(got.content(), new);
}

#[tokio::test]
async fn get_missing_is_none() {
    let store = open_memory().await.unwrap();
    assert!(store.get_by_id(42).await.unwrap().is_none());
}

#[tokio::test]
async fn ids_are_distinct() {
    let store = open_memory().await.unwrap();
    let a = store.insert(&record("A", ErrorKind::Io, 1)).await.unwrap();
    let b = store.insert(&record("A", ErrorKind::Io, 1)).await.unwrap();
    assert_ne!(a, b);
}

#[tokio::test]
async fn empty_message_or_source_rejected() {
    let store = open_memory().await.unwrap();
    let mut r = record("A", ErrorKind::Io, 1);
    r.message = "   ".to_string();
    assert!(matches!(
        store.insert(&r).await,
        Err(StoreError::InvalidRecord(_))
    ));
    let mut r = record("A", ErrorKind::Io, 1);
    r.source.clear();
    assert!(matches!(
        store.insert(&r).await,
        Err(StoreError::InvalidRecord(_))
    ));
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn recent_orders_by_timestamp_not_insertion() {
    let store = open_memory().await.unwrap();
    for ts in [30, 10, 50, 20, 40] {
        store.insert(&record("S", ErrorKind::Network, ts)).await.unwrap();
    }
    let recent = store.recent(3, &RecordFilter::All).await.unwrap();
    let stamps: Vec<i64> = recent.iter().map(|r| r.timestamp).collect();
    assert_eq!(stamps, vec![50, 40, 30]);

    let all = store.recent(100, &RecordFilter::All).await.unwrap();
    assert_eq!(all.len(), 5);
    assert!(all.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));

    assert!(store.recent(0, &RecordFilter::All).await.unwrap().is_empty());
}

#[tokio::test]
async fn recent_filters_by_source_or_kind() {
    let store = open_memory().await.unwrap();
    store.insert(&record("FeedDownload", ErrorKind::Network, 1)).await.unwrap();
    store.insert(&record("FeedDownload", ErrorKind::Parse, 2)).await.unwrap();
    store.insert(&record("TorrentEngine", ErrorKind::Io, 3)).await.unwrap();
    store.insert(&record("TorrentEngine", ErrorKind::Network, 4)).await.unwrap();

    let feed = store
        .recent(10, &RecordFilter::Source("FeedDownload".into()))
        .await
        .unwrap();
    assert_eq!(feed.len(), 2);
    assert!(feed.iter().all(|r| r.source == "FeedDownload"));
    assert_eq!(feed[0].timestamp, 2);

    let net = store
        .recent(10, &RecordFilter::Kind(ErrorKind::Network))
        .await
        .unwrap();
    assert_eq!(net.len(), 2);
    assert!(net.iter().all(|r| r.kind == ErrorKind::Network));
    assert_eq!(net[0].source, "TorrentEngine");

    let limited = store
        .recent(1, &RecordFilter::Kind(ErrorKind::Network))
        .await
        .unwrap();
    assert_eq!(limited.len(), 1);
}

#[tokio::test]
async fn prune_removes_only_older_and_is_idempotent() {
    let store = open_memory().await.unwrap();
    for ts in [100, 199, 200, 201, 300] {
        store.insert(&record("S", ErrorKind::Unknown, ts)).await.unwrap();
    }
    assert_eq!(store.prune_older_than(200).await.unwrap(), 2);
    assert_eq!(store.prune_older_than(200).await.unwrap(), 0);

    let left = store.recent(10, &RecordFilter::All).await.unwrap();
    let stamps: Vec<i64> = left.iter().map(|r| r.timestamp).collect();
    assert_eq!(stamps, vec![300, 201, 200]);
}

#[tokio::test]
async fn delete_by_id_and_clear_all() {
    let store = open_memory().await.unwrap();
    let a = store.insert(&record("S", ErrorKind::Io, 1)).await.unwrap();
    store.insert(&record("S", ErrorKind::Io, 2)).await.unwrap();
    store.insert(&record("S", ErrorKind::Io, 3)).await.unwrap();

    assert_eq!(store.delete_by_id(a).await.unwrap(), 1);
    assert_eq!(store.delete_by_id(a).await.unwrap(), 0);
    assert!(store.get_by_id(a).await.unwrap().is_none());

    assert_eq!(store.clear_all().await.unwrap(), 2);
    assert_eq!(store.clear_all().await.unwrap(), 0);
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn count_watch_tracks_inserts_and_deletes() {
    let store = open_memory().await.unwrap();
    let rx = store.watch_count();
    assert_eq!(*rx.borrow(), 0);

    let mut ids = Vec::new();
    for ts in 0..5 {
        ids.push(store.insert(&record("S", ErrorKind::Network, ts)).await.unwrap());
    }
    store.delete_by_id(ids[1]).await.unwrap();
    store.delete_by_id(ids[3]).await.unwrap();
    // A miss changes nothing.
    store.delete_by_id(9999).await.unwrap();

    assert_eq!(*rx.borrow(), 3);
    assert_eq!(store.count().await.unwrap(), 3);
}

#[tokio::test]
async fn count_stream_yields_current_then_changes() {
    use tokio_stream::StreamExt;

    let store = open_memory().await.unwrap();
    store.insert(&record("S", ErrorKind::Io, 1)).await.unwrap();

    let mut stream = store.count_stream();
    assert_eq!(stream.next().await, Some(1));

    store.insert(&record("S", ErrorKind::Io, 2)).await.unwrap();
    assert_eq!(stream.next().await, Some(2));

    store.clear_all().await.unwrap();
    assert_eq!(stream.next().await, Some(0));
}

#[tokio::test]
async fn unknown_stored_kind_reads_as_unknown() {
    let store = open_memory().await.unwrap();
    sqlx::query(
        "INSERT INTO error_log (kind, message, source, timestamp, retry_count, context_json)
         VALUES ('LEGACY_ERROR', 'old', 'Legacy', 5, 0, 'not json')",
    )
    .execute(&store.pool)
    .await
    .unwrap();
    let recent = store.recent(1, &RecordFilter::All).await.unwrap();
    assert_eq!(recent[0].kind, ErrorKind::Unknown);
    assert!(recent[0].context.is_none());
}

#[tokio::test]
async fn database_error_rows_read_and_filter_as_storage() {
    let store = open_memory().await.unwrap();
    sqlx::query(
        "INSERT INTO error_log (kind, message, source, timestamp, retry_count)
         VALUES ('DATABASE_ERROR', 'locked', 'Legacy', 5, 0)",
    )
    .execute(&store.pool)
    .await
    .unwrap();
    store
        .insert(&record("Feeds", ErrorKind::Storage, 6))
        .await
        .unwrap();

    let storage = store
        .recent(10, &RecordFilter::Kind(ErrorKind::Storage))
        .await
        .unwrap();
    assert_eq!(storage.len(), 2);
    assert!(storage.iter().all(|r| r.kind == ErrorKind::Storage));
    assert_eq!(storage[1].message, "locked");
}
