//! # Sync Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sync Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │     Cache       │  │      Runtime            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  CacheFailed    │  │  Internal               │ │
//! │  │  MissingDeviceId│  │  MalformedCache │  │  (tracker task failed)  │ │
//! │  │  ConfigLoad/Save│  │  Serialization  │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Gateway failures are NOT errors here: the gateway reports them as     │
//! │  `success: false` and the pipeline turns them into local fallbacks.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid sync configuration: {0}")]
    InvalidConfig(String),

    #[error("Device ID not configured")]
    MissingDeviceId,

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Cache Errors
    // =========================================================================
    /// Reading or writing the persistent cache failed.
    #[error("Cache error: {0}")]
    CacheFailed(String),

    /// Cached payload exists but does not decode.
    #[error("Malformed cache payload: {0}")]
    MalformedCache(String),

    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    // =========================================================================
    // Runtime Errors
    // =========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<moodmap_cache::CacheError> for SyncError {
    fn from(err: moodmap_cache::CacheError) -> Self {
        match err {
            moodmap_cache::CacheError::MalformedPayload { .. } => {
                SyncError::MalformedCache(err.to_string())
            }
            other => SyncError::CacheFailed(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::SerializationFailed(err.to_string())
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for SyncError {
    fn from(err: toml::ser::Error) -> Self {
        SyncError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl SyncError {
    /// True if the cache holds data this build cannot read.
    pub fn is_malformed_cache(&self) -> bool {
        matches!(
            self,
            SyncError::MalformedCache(_) | SyncError::SerializationFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert!(SyncError::MalformedCache("x".into()).is_malformed_cache());
        assert!(SyncError::SerializationFailed("x".into()).is_malformed_cache());
        assert!(!SyncError::CacheFailed("locked".into()).is_malformed_cache());
    }

    #[test]
    fn test_cache_error_conversion() {
        let err: SyncError = moodmap_cache::CacheError::malformed("moods", "bad").into();
        assert!(matches!(err, SyncError::MalformedCache(_)));

        let err: SyncError = moodmap_cache::CacheError::PoolExhausted.into();
        assert!(matches!(err, SyncError::CacheFailed(_)));
    }
}
