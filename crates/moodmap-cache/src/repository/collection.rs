//! # Collection Repository
//!
//! Whole collections stored as JSON text under a stable string key.
//! A `put` replaces the previous value; there are no partial updates.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{CacheError, CacheResult};

/// Repository for keyed JSON collections.
#[derive(Debug, Clone)]
pub struct CollectionRepository {
    pool: SqlitePool,
}

impl CollectionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CollectionRepository { pool }
    }

    /// Returns the raw JSON stored under `key`, if any.
    pub async fn get_raw(&self, key: &str) -> CacheResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM cache_entries WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    /// Reads and decodes the value under `key`.
    ///
    /// ## Returns
    /// * `Ok(None)` - nothing stored
    /// * `Err(MalformedPayload)` - stored text does not decode as `T`
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| CacheError::malformed(key, e)),
            None => Ok(None),
        }
    }

    /// Encodes `value` and stores it under `key`, replacing any previous value.
    pub async fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> CacheResult<()> {
        let payload = serde_json::to_string(value)?;
        self.put_raw(key, &payload).await
    }

    /// Stores already-encoded JSON under `key`.
    pub async fn put_raw(&self, key: &str, payload: &str) -> CacheResult<()> {
        debug!(key = %key, bytes = payload.len(), "Writing cache entry");

        sqlx::query(
            r#"
            INSERT INTO cache_entries (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
