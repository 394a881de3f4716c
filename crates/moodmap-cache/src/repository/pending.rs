//! # Pending Write Repository
//!
//! Outbox of writes accepted on this device but not yet confirmed by the
//! remote store.
//!
//! ## Outbox Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     pending_writes row lifecycle                        │
//! │                                                                         │
//! │  pipeline keeps a write locally after the gateway failed               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  gateway.queue_mood(entry) / queue_settings(patch)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  enqueue(kind, entity_id, payload)     entity_id = visible entry id    │
//! │                                                                         │
//! │  pending(limit)   oldest first, for whatever delivers them             │
//! │  count_pending()  == SyncStatus.pending_sync_count                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{CacheError, CacheResult};

// =============================================================================
// Entry Types
// =============================================================================

/// What a pending write carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PendingWriteKind {
    /// A full mood entry (payload is the entry JSON).
    Mood,
    /// A settings fragment (payload is the patch JSON).
    Settings,
}

impl PendingWriteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PendingWriteKind::Mood => "mood",
            PendingWriteKind::Settings => "settings",
        }
    }
}

impl std::str::FromStr for PendingWriteKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mood" => Ok(PendingWriteKind::Mood),
            "settings" => Ok(PendingWriteKind::Settings),
            other => Err(CacheError::malformed(
                "pending_writes.kind",
                format!("unknown kind '{}'", other),
            )),
        }
    }
}

/// One row of the outbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingWrite {
    pub id: String,
    pub kind: PendingWriteKind,
    /// Id of the mood entry, or `"settings"` for settings fragments.
    pub entity_id: String,
    /// JSON body to send upstream.
    pub payload: String,
    pub created_at: DateTime<Utc>,
}

impl PendingWrite {
    fn from_row(row: &SqliteRow) -> CacheResult<Self> {
        let kind: String = row.try_get("kind")?;
        Ok(PendingWrite {
            id: row.try_get("id")?,
            kind: kind.parse()?,
            entity_id: row.try_get("entity_id")?,
            payload: row.try_get("payload")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for the outbox.
#[derive(Debug, Clone)]
pub struct PendingWriteRepository {
    pool: SqlitePool,
}

impl PendingWriteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PendingWriteRepository { pool }
    }

    /// Queues a write for later delivery.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let payload = serde_json::to_string(&entry)?;
    /// repo.enqueue(PendingWriteKind::Mood, &entry.id, &payload).await?;
    /// ```
    pub async fn enqueue(
        &self,
        kind: PendingWriteKind,
        entity_id: &str,
        payload: &str,
    ) -> CacheResult<PendingWrite> {
        let entry = PendingWrite {
            id: Uuid::new_v4().to_string(),
            kind,
            entity_id: entity_id.to_string(),
            payload: payload.to_string(),
            created_at: Utc::now(),
        };

        debug!(
            kind = kind.as_str(),
            entity_id = %entity_id,
            "Queuing pending write"
        );

        sqlx::query(
            r#"
            INSERT INTO pending_writes (id, kind, entity_id, payload, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&entry.id)
        .bind(entry.kind.as_str())
        .bind(&entry.entity_id)
        .bind(&entry.payload)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Queued entries, oldest first.
    pub async fn pending(&self, limit: u32) -> CacheResult<Vec<PendingWrite>> {
        let rows = sqlx::query(
            r#"
            SELECT id, kind, entity_id, payload, created_at
            FROM pending_writes
            ORDER BY created_at ASC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(PendingWrite::from_row).collect()
    }

    pub async fn count_pending(&self) -> CacheResult<u32> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pending_writes")
            .fetch_one(&self.pool)
            .await?;
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
