//! # moodmap-sync: Runtime Layer for Moodmap
//!
//! Owns the live view model and every path that changes it: startup load,
//! user writes, status polling and explicit resync.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Moodmap Data Flow                              │
//! │                                                                         │
//! │   RemoteGateway                                  MoodCache (SQLite)     │
//! │   (authoritative,                                (survives restarts)    │
//! │    intermittent)                                        ▲               │
//! │        │                                                │ write-through │
//! │        ▼                                                │               │
//! │  ┌───────────┐   ReplaceAllData   ┌──────────────────────────────┐     │
//! │  │ bootstrap │ ─────────────────► │                              │     │
//! │  └───────────┘                    │            Store             │     │
//! │  ┌───────────┐   AppendMood /     │   watch::Sender<AppState>    │     │
//! │  │ pipeline  │ ─ MergeSettings ─► │   reduce(state, action)      │     │
//! │  └───────────┘                    │                              │     │
//! │  ┌───────────┐   UpdateSync-      │                              │     │
//! │  │  tracker  │ ─ Status ────────► │                              │     │
//! │  └───────────┘                    │                              │     │
//! │  ┌───────────┐   ReplaceAllData / │                              │     │
//! │  │  resync   │ ─ SetError ──────► │                              │     │
//! │  └───────────┘                    └──────────────┬───────────────┘     │
//! │                                                  ▼ subscribe()         │
//! │                                                 UI                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`store`] - Shared state handle, dispatch and transient messages
//! - [`bootstrap`] - Startup load: remote, then cache, then defaults
//! - [`pipeline`] - Optimistic `add_mood` / `update_settings`
//! - [`status`] - Periodic sync status tracker
//! - [`resync`] - Explicit push-then-reload
//! - [`session`] - Process-scoped owner of all of the above
//! - [`gateway`] - Remote store seam and the offline gateway
//! - [`cache`] - Persistent cache seam
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Sync error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use moodmap_cache::{CacheConfig, Database};
//! use moodmap_sync::{MoodSession, OfflineGateway, SyncConfig};
//!
//! let config = SyncConfig::load_or_default(None);
//! let db = Database::new(CacheConfig::new(config.cache_path())).await?;
//!
//! let session = MoodSession::start(
//!     &config,
//!     Arc::new(OfflineGateway::new(db.clone())),
//!     Arc::new(db),
//! )
//! .await?;
//!
//! let mut updates = session.subscribe();
//! session.add_mood(draft).await;
//! session.shutdown().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bootstrap;
pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod gateway;
pub mod pipeline;
pub mod resync;
pub mod session;
pub mod status;
pub mod store;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use bootstrap::{bootstrap, BootstrapReport, MoodSource};
pub use cache::{write_through, MoodCache, MOODS_KEY, SETTINGS_KEY};
pub use config::{SyncConfig, SyncMode, SyncTimings};
pub use context::SyncContext;
pub use error::{SyncError, SyncResult};
pub use gateway::{GatewayResponse, OfflineGateway, RemoteGateway};
pub use pipeline::{add_mood, update_settings, MutationOutcome};
pub use resync::{resync, ResyncOutcome};
pub use session::MoodSession;
pub use status::{poll_once, refresh_status, StatusTracker, StatusTrackerHandle};
pub use store::Store;
