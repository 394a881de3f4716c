//! # Cache Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error / MigrateError / serde_json::Error                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CacheError (this module)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SyncError::Cache (moodmap-sync) ← logged, then degraded around        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Cache operation errors.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Row not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Database could not be opened.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// All pooled connections are busy.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Stored value is not valid JSON for the requested type.
    ///
    /// ## When This Occurs
    /// - Cache written by an older build with a different shape
    /// - Manual edits to the database file
    #[error("Malformed payload under '{key}': {message}")]
    MalformedPayload { key: String, message: String },

    /// Value could not be encoded for storage.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Internal cache error: {0}")]
    Internal(String),
}

impl CacheError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        CacheError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn malformed(key: impl Into<String>, err: impl std::fmt::Display) -> Self {
        CacheError::MalformedPayload {
            key: key.into(),
            message: err.to_string(),
        }
    }
}

/// Convert sqlx errors to CacheError.
///
/// ```text
/// sqlx::Error::RowNotFound    → CacheError::NotFound
/// sqlx::Error::Database       → CacheError::QueryFailed
/// sqlx::Error::PoolTimedOut   → CacheError::PoolExhausted
/// sqlx::Error::PoolClosed     → CacheError::ConnectionFailed
/// Other                       → CacheError::Internal
/// ```
impl From<sqlx::Error> for CacheError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => CacheError::not_found("Record", "unknown"),
            sqlx::Error::Database(db_err) => CacheError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => CacheError::PoolExhausted,
            sqlx::Error::PoolClosed => CacheError::ConnectionFailed("Pool is closed".to_string()),
            _ => CacheError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for CacheError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        CacheError::MigrationFailed(err.to_string())
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: CacheError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, CacheError::NotFound { .. }));
    }

    #[test]
    fn test_pool_errors() {
        let err: CacheError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, CacheError::PoolExhausted));
        let err: CacheError = sqlx::Error::PoolClosed.into();
        assert_eq!(err.to_string(), "Connection failed: Pool is closed");
    }

    #[test]
    fn test_malformed_message() {
        let err = CacheError::malformed("moods", "expected array");
        assert_eq!(
            err.to_string(),
            "Malformed payload under 'moods': expected array"
        );
    }
}
