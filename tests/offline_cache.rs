//! Integration tests for the persisted snapshot: what an online load leaves in
//! the store and how an offline start reads it back.
//!
//! SQLite tests use an in-memory database; failure injection uses
//! `MemoryStore`.

use chrono::{DateTime, Utc};
use newsdesk::connectivity::ManualMonitor;
use newsdesk::news::{Article, FixtureSource};
use newsdesk::storage::{
    MemoryStore, PersistentStore, SqliteStore, StoreError, CACHE_KEY, LAST_UPDATE_KEY,
};
use newsdesk::sync::{Advisory, LoadOutcome, SyncCache, SyncError};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

async fn sqlite() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::open(":memory:").await.unwrap())
}

fn fixture() -> Arc<FixtureSource> {
    Arc::new(FixtureSource::builtin(Duration::ZERO))
}

// ============================================================================
// Wire format
// ============================================================================

#[tokio::test]
async fn test_online_load_writes_both_keys() {
    let store = sqlite().await;
    let (sync, _rx) = SyncCache::new(fixture(), store.clone(), true);
    sync.load().await.unwrap();

    let payload = store.get(CACHE_KEY).await.unwrap().unwrap();
    let articles: Vec<Article> = serde_json::from_str(&payload).unwrap();
    assert_eq!(articles, *sync.articles());
    assert!(payload.contains("\"publishedAt\""));

    let stamp = store.get(LAST_UPDATE_KEY).await.unwrap().unwrap();
    assert!(stamp.ends_with('Z'), "timestamp not in UTC Z form: {stamp}");
    assert_eq!(stamp.len(), "2025-10-09T08:30:00.000Z".len());
    let parsed: DateTime<Utc> = stamp.parse().unwrap();
    assert_eq!(Some(parsed), sync.last_update());
}

// ============================================================================
// Offline restore
// ============================================================================

#[tokio::test]
async fn test_offline_start_after_online_run() {
    let store = sqlite().await;

    let (online, _rx) = SyncCache::new(fixture(), store.clone(), true);
    online.load().await.unwrap();

    let (offline, mut rx) = SyncCache::new(fixture(), store.clone(), false);
    assert_eq!(offline.load().await.unwrap(), LoadOutcome::Restored { count: 6 });
    assert_eq!(*offline.articles(), *online.articles());
    assert!(offline.last_update().is_some());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_offline_restore_survives_reopen() {
    let dir = std::env::temp_dir().join(format!("newsdesk_offline_reopen_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("cache.db");
    let path = path.to_str().unwrap();

    {
        let store = Arc::new(SqliteStore::open(path).await.unwrap());
        let (sync, _rx) = SyncCache::new(fixture(), store, true);
        sync.load().await.unwrap();
    }

    let store = Arc::new(SqliteStore::open(path).await.unwrap());
    let (sync, _rx) = SyncCache::new(fixture(), store, false);
    assert_eq!(sync.load().await.unwrap(), LoadOutcome::Restored { count: 6 });

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_corrupt_payload_is_treated_as_no_cache() {
    let store = sqlite().await;
    store.set(CACHE_KEY, "{not json").await.unwrap();
    store.set(LAST_UPDATE_KEY, "2025-10-09T08:30:00.000Z").await.unwrap();

    let (sync, mut rx) = SyncCache::new(fixture(), store, false);
    assert!(matches!(sync.load().await, Err(SyncError::NoCachedData)));
    assert!(sync.articles().is_empty());
    assert_eq!(rx.try_recv().ok(), Some(Advisory::NoCacheAvailable));
}

#[tokio::test]
async fn test_payload_without_timestamp_is_adopted() {
    let store = sqlite().await;
    let (seed, _rx) = SyncCache::new(fixture(), store.clone(), true);
    seed.load().await.unwrap();
    store.set(LAST_UPDATE_KEY, "yesterday-ish").await.unwrap();

    let (sync, _rx) = SyncCache::new(fixture(), store.clone(), false);
    assert_eq!(sync.load().await.unwrap(), LoadOutcome::Restored { count: 6 });
    assert!(sync.last_update().is_none());

    store.remove(LAST_UPDATE_KEY).await.unwrap();
    let (sync, _rx) = SyncCache::new(fixture(), store, false);
    assert_eq!(sync.load().await.unwrap(), LoadOutcome::Restored { count: 6 });
    assert!(sync.last_update().is_none());
}

// ============================================================================
// Store failures
// ============================================================================

#[tokio::test]
async fn test_persist_failure_keeps_fresh_articles() {
    let store = Arc::new(MemoryStore::new());
    store.set_fail_writes(true);
    let (sync, mut rx) = SyncCache::new(fixture(), store.clone(), true);

    let err = sync.load().await.unwrap_err();
    assert!(matches!(err, SyncError::PersistFailed(StoreError::Unavailable(_))));
    assert_eq!(sync.articles().len(), 6);
    assert!(sync.last_update().is_some());
    assert!(!sync.is_loading());
    assert!(matches!(rx.try_recv(), Ok(Advisory::PersistFailed(_))));

    // Neither key was written
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_cache_read_failure_reports_load_failed() {
    let store = Arc::new(MemoryStore::new());
    let (seed, _rx) = SyncCache::new(fixture(), store.clone(), true);
    seed.load().await.unwrap();
    store.set_fail_reads(true);

    let (sync, mut rx) = SyncCache::new(fixture(), store, false);
    let err = sync.load().await.unwrap_err();
    assert!(matches!(err, SyncError::CacheReadFailed(_)));
    assert!(sync.articles().is_empty());
    assert!(matches!(rx.try_recv(), Ok(Advisory::LoadFailed(_))));
}

// ============================================================================
// Connectivity wiring
// ============================================================================

#[tokio::test]
async fn test_monitor_drives_offline_then_restore() {
    let store = sqlite().await;
    let monitor = ManualMonitor::new(true);

    let (seed, _rx) = SyncCache::new(fixture(), store.clone(), true);
    seed.load().await.unwrap();

    let (sync, mut rx) = SyncCache::new(fixture(), store, true);
    let sync = Arc::new(sync);
    let listener = sync.listen(&monitor);
    assert_eq!(monitor.subscriber_count(), 1);

    monitor.set_connected(false);
    assert_eq!(rx.recv().await, Some(Advisory::WentOffline));
    assert!(!sync.is_online());

    assert_eq!(sync.load().await.unwrap(), LoadOutcome::Restored { count: 6 });
    assert!(matches!(sync.refresh().await, Err(SyncError::RefreshWhileOffline)));
    assert_eq!(rx.recv().await, Some(Advisory::RefreshRejectedOffline));

    drop(listener);
    for _ in 0..100 {
        if monitor.subscriber_count() == 0 {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(monitor.subscriber_count(), 0);
}
