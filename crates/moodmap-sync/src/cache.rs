//! # Persistent Cache Seam
//!
//! What the runtime needs from durable storage: two whole collections under
//! stable keys. Timestamps travel as RFC 3339 strings and come back as
//! `DateTime<Utc>` through serde.

use async_trait::async_trait;
use tracing::{debug, warn};

use moodmap_cache::Database;
use moodmap_core::{AppState, MoodEntry, SettingsPatch, UserSettings};

use crate::error::SyncResult;

/// Cache key of the mood collection.
pub const MOODS_KEY: &str = "moods";

/// Cache key of the settings object.
pub const SETTINGS_KEY: &str = "settings";

#[async_trait]
pub trait MoodCache: Send + Sync {
    /// `Ok(None)` when nothing has been cached yet.
    async fn load_moods(&self) -> SyncResult<Option<Vec<MoodEntry>>>;

    /// Loaded as a fragment so groups missing from old payloads fall back
    /// to defaults when overlaid.
    async fn load_settings(&self) -> SyncResult<Option<SettingsPatch>>;

    async fn save_moods(&self, moods: &[MoodEntry]) -> SyncResult<()>;

    async fn save_settings(&self, settings: &UserSettings) -> SyncResult<()>;
}

#[async_trait]
impl MoodCache for Database {
    async fn load_moods(&self) -> SyncResult<Option<Vec<MoodEntry>>> {
        Ok(self.collections().get(MOODS_KEY).await?)
    }

    async fn load_settings(&self) -> SyncResult<Option<SettingsPatch>> {
        Ok(self.collections().get(SETTINGS_KEY).await?)
    }

    async fn save_moods(&self, moods: &[MoodEntry]) -> SyncResult<()> {
        Ok(self.collections().put(MOODS_KEY, moods).await?)
    }

    async fn save_settings(&self, settings: &UserSettings) -> SyncResult<()> {
        Ok(self.collections().put(SETTINGS_KEY, settings).await?)
    }
}

/// Mirrors the data part of `state` into the cache. Failures are logged.
pub async fn write_through(cache: &dyn MoodCache, state: &AppState) {
    if let Err(e) = cache.save_moods(&state.moods).await {
        warn!(?e, "Failed to cache moods");
    }
    if let Err(e) = cache.save_settings(&state.settings).await {
        warn!(?e, "Failed to cache settings");
    }
    debug!(moods = state.moods.len(), "Cache write-through complete");
}
