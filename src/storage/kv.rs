use async_trait::async_trait;

use super::schema::SqliteStore;
use super::types::StoreError;
use super::PersistentStore;

#[async_trait]
impl PersistentStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(value,)| value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.set_many(&[(key, value)]).await
    }

    /// All entries are written in one transaction: either every key is
    /// updated or none is.
    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        for &(key, value) in entries {
            sqlx::query(
                r#"
                INSERT INTO kv_store (key, value, updated_at)
                VALUES (?, ?, datetime('now'))
                ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            )
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::{PersistentStore, SqliteStore};

    async fn test_store() -> SqliteStore {
        SqliteStore::open(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = test_store().await;
        assert_eq!(store.get("nonexistent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let store = test_store().await;
        store.set("cached_news", "[]").await.unwrap();
        assert_eq!(store.get("cached_news").await.unwrap(), Some("[]".to_string()));
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = test_store().await;
        store.set("last_updated", "a").await.unwrap();
        store.set("last_updated", "b").await.unwrap();
        assert_eq!(store.get("last_updated").await.unwrap(), Some("b".to_string()));

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM kv_store")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(count.0, 1);
    }

    #[tokio::test]
    async fn test_set_many_writes_all_keys() {
        let store = test_store().await;
        store
            .set_many(&[("cached_news", "[1]"), ("last_updated", "ts")])
            .await
            .unwrap();
        assert_eq!(store.get("cached_news").await.unwrap(), Some("[1]".to_string()));
        assert_eq!(store.get("last_updated").await.unwrap(), Some("ts".to_string()));
    }

    #[tokio::test]
    async fn test_set_many_rolls_back_on_failure() {
        let store = test_store().await;
        store.set("cached_news", "old").await.unwrap();

        // A trigger rejecting one key forces the second insert to fail mid-transaction.
        sqlx::query(
            r#"
            CREATE TRIGGER reject_ts BEFORE INSERT ON kv_store
            WHEN new.key = 'last_updated'
            BEGIN SELECT RAISE(ABORT, 'rejected'); END
        "#,
        )
        .execute(&store.pool)
        .await
        .unwrap();

        let result = store
            .set_many(&[("cached_news", "new"), ("last_updated", "ts")])
            .await;
        assert!(result.is_err());
        assert_eq!(store.get("cached_news").await.unwrap(), Some("old".to_string()));
        assert_eq!(store.get("last_updated").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = test_store().await;
        store.set("cached_news", "[]").await.unwrap();
        store.remove("cached_news").await.unwrap();
        assert_eq!(store.get("cached_news").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reopen_file_keeps_values() {
        let dir = std::env::temp_dir().join("newsdesk_kv_test_reopen");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cache.db");
        let _ = std::fs::remove_file(&path);
        let path_str = path.to_str().unwrap();

        {
            let store = SqliteStore::open(path_str).await.unwrap();
            store.set("last_updated", "2025-10-09T08:30:00.000Z").await.unwrap();
            store.pool.close().await;
        }

        let store = SqliteStore::open(path_str).await.unwrap();
        assert_eq!(
            store.get("last_updated").await.unwrap(),
            Some("2025-10-09T08:30:00.000Z".to_string())
        );
        store.pool.close().await;

        std::fs::remove_dir_all(&dir).ok();
    }
}
