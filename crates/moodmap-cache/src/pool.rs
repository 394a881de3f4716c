//! # Cache Pool Management
//!
//! Connection pool creation and configuration for the SQLite cache.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cache Connection Pool                              │
//! │                                                                         │
//! │  moodmap binary startup                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CacheConfig::new(path) ← from [cache] config section                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← open pool + run migrations              │
//! │       │                                                                 │
//! │       ├──► db.collections()     moods / settings JSON                  │
//! │       └──► db.pending_writes()  outbox                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.close().await ← on session shutdown                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! File-backed caches use WAL journaling so the status poller can count the
//! outbox while a write-through is in progress.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{CacheError, CacheResult};
use crate::migrations;
use crate::repository::collection::CollectionRepository;
use crate::repository::pending::PendingWriteRepository;

const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Cache configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = CacheConfig::new("/path/to/moodmap.db").max_connections(2);
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Default: 4
    pub max_connections: u32,

    /// Default: 1
    pub min_connections: u32,

    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Default: true
    pub run_migrations: bool,
}

impl CacheConfig {
    /// Creates a configuration for the given file. The file is created on
    /// first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CacheConfig {
            database_path: path.into(),
            max_connections: 4,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// In-memory cache for tests. Contents vanish with the pool.
    pub fn in_memory() -> Self {
        CacheConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            // A second connection would open a second, empty database.
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the cache database. Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and, unless disabled, applies pending migrations.
    pub async fn new(config: CacheConfig) -> CacheResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening cache database"
        );

        let connect_options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| CacheError::ConnectionFailed(e.to_string()))?
        } else {
            if let Some(parent) = config.database_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| CacheError::ConnectionFailed(e.to_string()))?;
                }
            }
            let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());
            SqliteConnectOptions::from_str(&connect_url)
                .map_err(|e| CacheError::ConnectionFailed(e.to_string()))?
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true)
        };

        debug!("Connection options configured");

        // The in-memory database lives exactly as long as its one connection.
        let idle_timeout = if config.is_in_memory() {
            None
        } else {
            Some(config.idle_timeout)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(idle_timeout)
            .max_lifetime(None)
            .connect_with(connect_options)
            .await
            .map_err(|e| CacheError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Cache pool created"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations. Idempotent.
    pub async fn run_migrations(&self) -> CacheResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Keyed JSON collections (`moods`, `settings`).
    pub fn collections(&self) -> CollectionRepository {
        CollectionRepository::new(self.pool.clone())
    }

    /// Outbox of writes the remote store has not confirmed.
    pub fn pending_writes(&self) -> PendingWriteRepository {
        PendingWriteRepository::new(self.pool.clone())
    }

    /// Closes the pool. Repository calls fail afterwards.
    pub async fn close(&self) {
        info!("Closing cache database");
        self.pool.close().await;
    }

    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
