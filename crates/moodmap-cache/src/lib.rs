//! # moodmap-cache: Persistent Cache for Moodmap
//!
//! SQLite-backed storage for the two collections the app keeps between
//! runs, plus the outbox of writes that have not reached the remote store.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Moodmap Data Flow                                │
//! │                                                                         │
//! │  moodmap-sync (bootstrap / pipeline / resync)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   moodmap-cache (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │   Repositories     │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │◄───│ CollectionRepo     │  │ (embedded) │  │   │
//! │  │   │  SqlitePool   │    │ PendingWriteRepo   │  │ 001_*.sql  │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   SQLite file in the platform data dir (moodmap.db)             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use moodmap_cache::{CacheConfig, Database};
//!
//! let db = Database::new(CacheConfig::new("moodmap.db")).await?;
//! db.collections().put("moods", &moods).await?;
//! let count = db.pending_writes().count_pending().await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{CacheError, CacheResult};
pub use pool::{CacheConfig, Database};
pub use repository::collection::CollectionRepository;
pub use repository::pending::{PendingWrite, PendingWriteKind, PendingWriteRepository};
