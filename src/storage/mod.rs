//! Persistence for the article cache.
//!
//! The cache is two entries in a string key-value store: the JSON article
//! list under [`CACHE_KEY`] and its fetch time under [`LAST_UPDATE_KEY`].
//! [`SqliteStore`] is the durable backend, [`MemoryStore`] the ephemeral one.

mod kv;
mod memory;
mod schema;
mod snapshot;
mod types;

use async_trait::async_trait;

pub use memory::MemoryStore;
pub use schema::SqliteStore;
pub use snapshot::{
    format_timestamp, parse_timestamp, read_snapshot, write_snapshot, CacheSnapshot, CACHE_KEY,
    LAST_UPDATE_KEY,
};
pub use types::{DatabaseError, StoreError};

/// String key-value storage used for the cache snapshot.
///
/// Operations are issued sequentially by a single owner; implementations do
/// not need to arbitrate between writers.
#[async_trait]
pub trait PersistentStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Write several entries atomically: all of them or none.
    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StoreError>;

    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
