use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised while opening the SQLite backing store.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Another instance of the application has locked the database
    #[error("Another instance of newsdesk appears to be running. Please close it and try again.")]
    InstanceLocked,

    /// Migration failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// Generic database error
    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Check if a sqlx error indicates database locking
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        if is_lock_message(&err.to_string()) {
            return DatabaseError::InstanceLocked;
        }
        DatabaseError::Other(err)
    }
}

/// SQLITE_BUSY (5), SQLITE_LOCKED (6) and SQLITE_CANTOPEN (14) all surface as
/// lock contention from the user's point of view.
pub(crate) fn is_lock_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("database is locked")
        || lower.contains("database table is locked")
        || lower.contains("sqlite_busy")
        || lower.contains("sqlite_locked")
        || lower.contains("unable to open database file")
}

/// Errors from a key-value store read or write.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The SQLite backend rejected the operation
    #[error("Storage error: {0}")]
    Database(#[from] sqlx::Error),

    /// The backend is not accepting operations
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The cache payload could not be serialized
    #[error("Failed to encode cache payload: {0}")]
    Encode(#[from] serde_json::Error),
}
