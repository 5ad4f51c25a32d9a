use chrono::{DateTime, SecondsFormat, Utc};

use super::types::StoreError;
use super::PersistentStore;
use crate::news::Article;

/// Store key holding the JSON-encoded article list.
pub const CACHE_KEY: &str = "cached_news";
/// Store key holding the ISO-8601 timestamp of the last successful fetch.
pub const LAST_UPDATE_KEY: &str = "last_updated";

/// The last successfully fetched article list and when it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSnapshot {
    pub articles: Vec<Article>,
    /// `None` only when the timestamp entry is missing or unreadable.
    pub last_update: Option<DateTime<Utc>>,
}

/// Render a timestamp the way it is persisted: UTC, millisecond precision, `Z` suffix.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Persist `articles` and `at` as the current snapshot.
///
/// Both keys are written in a single `set_many` call, so the payload and its
/// timestamp are replaced together.
pub async fn write_snapshot(
    store: &dyn PersistentStore,
    articles: &[Article],
    at: DateTime<Utc>,
) -> Result<(), StoreError> {
    let payload = serde_json::to_string(articles)?;
    let timestamp = format_timestamp(at);

    store
        .set_many(&[(CACHE_KEY, payload.as_str()), (LAST_UPDATE_KEY, timestamp.as_str())])
        .await?;

    tracing::debug!(
        count = articles.len(),
        bytes = payload.len(),
        last_update = %timestamp,
        "Wrote cache snapshot"
    );
    Ok(())
}

/// Read the persisted snapshot.
///
/// Returns `Ok(None)` when no article payload is stored, or when the stored
/// payload cannot be decoded. A payload with a missing or malformed timestamp
/// is still returned, with `last_update` set to `None`.
pub async fn read_snapshot(store: &dyn PersistentStore) -> Result<Option<CacheSnapshot>, StoreError> {
    let Some(payload) = store.get(CACHE_KEY).await? else {
        return Ok(None);
    };
    let raw_timestamp = store.get(LAST_UPDATE_KEY).await?;

    let articles: Vec<Article> = match serde_json::from_str(&payload) {
        Ok(articles) => articles,
        Err(e) => {
            tracing::warn!(error = %e, bytes = payload.len(), "Cached article payload is corrupt, ignoring");
            return Ok(None);
        }
    };

    let last_update = match raw_timestamp.as_deref() {
        Some(raw) => {
            let parsed = parse_timestamp(raw);
            if parsed.is_none() {
                tracing::warn!(value = %raw, "Cached timestamp is malformed");
            }
            parsed
        }
        None => None,
    };

    Ok(Some(CacheSnapshot {
        articles,
        last_update,
    }))
}
