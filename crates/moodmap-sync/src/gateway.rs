//! # Remote Gateway
//!
//! The seam between this device and the authoritative remote store.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       RemoteGateway Contract                            │
//! │                                                                         │
//! │  get_moods()            -> GatewayResponse<Vec<MoodEntry>>             │
//! │  get_settings()         -> GatewayResponse<SettingsPatch>              │
//! │  create_mood(draft)     -> GatewayResponse<MoodEntry>                  │
//! │  update_settings(patch) -> GatewayResponse<SettingsPatch>              │
//! │  sync_data()            -> ()        best effort                       │
//! │  is_offline()           -> bool                                        │
//! │  pending_sync_count()   -> u32                                         │
//! │  queue_mood(entry)      -> ()        kept locally after a failed write │
//! │  queue_settings(patch)  -> ()        kept locally after a failed write │
//! │                                                                         │
//! │  No call ever returns Err or panics on a network problem: failure is   │
//! │  `success: false`. Transport, retries and auth live behind this trait. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use tracing::{debug, warn};

use moodmap_cache::{Database, PendingWriteKind};
use moodmap_core::{MoodDraft, MoodEntry, SettingsPatch};

// =============================================================================
// Gateway Response
// =============================================================================

/// Outcome of a gateway data call.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse<T> {
    pub success: bool,
    pub data: Option<T>,
}

impl<T> GatewayResponse<T> {
    pub fn ok(data: T) -> Self {
        GatewayResponse {
            success: true,
            data: Some(data),
        }
    }

    /// Success without a payload.
    pub fn ok_empty() -> Self {
        GatewayResponse {
            success: true,
            data: None,
        }
    }

    pub fn failed() -> Self {
        GatewayResponse {
            success: false,
            data: None,
        }
    }

    /// Payload of a successful call. `None` for failures.
    pub fn into_success_data(self) -> Option<T> {
        if self.success {
            self.data
        } else {
            None
        }
    }
}

// =============================================================================
// Gateway Trait
// =============================================================================

#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn get_moods(&self) -> GatewayResponse<Vec<MoodEntry>>;

    async fn get_settings(&self) -> GatewayResponse<SettingsPatch>;

    /// On success the payload carries the server-issued id and timestamp.
    async fn create_mood(&self, draft: &MoodDraft) -> GatewayResponse<MoodEntry>;

    /// On success the payload is the server's canonical fragment.
    async fn update_settings(&self, patch: &SettingsPatch) -> GatewayResponse<SettingsPatch>;

    /// Pushes queued local-only writes upstream.
    async fn sync_data(&self);

    async fn is_offline(&self) -> bool;

    async fn pending_sync_count(&self) -> u32;

    /// Receives the entry that became visible after `create_mood` failed,
    /// so a later `sync_data` can deliver it under the same id and
    /// timestamp. Gateways without an outbox ignore it.
    async fn queue_mood(&self, _entry: &MoodEntry) {}

    /// Receives a settings fragment merged locally after `update_settings`
    /// failed.
    async fn queue_settings(&self, _patch: &SettingsPatch) {}

    /// Name used in logs.
    fn name(&self) -> &str;
}

// =============================================================================
// Offline Gateway
// =============================================================================

/// Gateway for devices with the remote disabled.
///
/// Reads and writes fail. Writes the pipeline keeps locally land in the
/// cache outbox, and the pending count is the outbox depth. Queued writes
/// stay there until a build with a live transport drains them.
#[derive(Debug, Clone)]
pub struct OfflineGateway {
    db: Database,
}

impl OfflineGateway {
    pub fn new(db: Database) -> Self {
        OfflineGateway { db }
    }

    async fn enqueue(&self, kind: PendingWriteKind, entity_id: &str, payload: String) {
        if let Err(e) = self
            .db
            .pending_writes()
            .enqueue(kind, entity_id, &payload)
            .await
        {
            warn!(?e, kind = kind.as_str(), "Failed to queue pending write");
        }
    }
}

#[async_trait]
impl RemoteGateway for OfflineGateway {
    async fn get_moods(&self) -> GatewayResponse<Vec<MoodEntry>> {
        GatewayResponse::failed()
    }

    async fn get_settings(&self) -> GatewayResponse<SettingsPatch> {
        GatewayResponse::failed()
    }

    async fn create_mood(&self, _draft: &MoodDraft) -> GatewayResponse<MoodEntry> {
        GatewayResponse::failed()
    }

    async fn update_settings(&self, _patch: &SettingsPatch) -> GatewayResponse<SettingsPatch> {
        GatewayResponse::failed()
    }

    async fn sync_data(&self) {
        debug!("Remote disabled, nothing to push");
    }

    async fn is_offline(&self) -> bool {
        true
    }

    async fn pending_sync_count(&self) -> u32 {
        self.db
            .pending_writes()
            .count_pending()
            .await
            .unwrap_or_else(|e| {
                warn!(?e, "Failed to count pending writes");
                0
            })
    }

    async fn queue_mood(&self, entry: &MoodEntry) {
        match serde_json::to_string(entry) {
            Ok(payload) => {
                self.enqueue(PendingWriteKind::Mood, &entry.id, payload)
                    .await
            }
            Err(e) => warn!(?e, id = %entry.id, "Failed to encode mood entry"),
        }
    }

    async fn queue_settings(&self, patch: &SettingsPatch) {
        match serde_json::to_string(patch) {
            Ok(payload) => {
                self.enqueue(PendingWriteKind::Settings, "settings", payload)
                    .await
            }
            Err(e) => warn!(?e, "Failed to encode settings patch"),
        }
    }

    fn name(&self) -> &str {
        "offline"
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncTimings;
    use crate::context::SyncContext;
    use crate::pipeline::{add_mood, update_settings, MutationOutcome};
    use crate::store::Store;
    use moodmap_cache::CacheConfig;
    use moodmap_core::settings::{DisplaySettings, Theme};
    use moodmap_core::{Intensity, MoodName};
    use std::sync::Arc;

    #[test]
    fn test_response_helpers() {
        assert_eq!(GatewayResponse::ok(3).into_success_data(), Some(3));
        assert_eq!(GatewayResponse::<u8>::ok_empty().into_success_data(), None);

        // A failed response never exposes a payload, even if one is attached.
        let odd = GatewayResponse {
            success: false,
            data: Some(1),
        };
        assert_eq!(odd.into_success_data(), None);
    }

    #[tokio::test]
    async fn test_offline_gateway_queues_kept_writes() {
        let db = Database::new(CacheConfig::in_memory()).await.unwrap();
        let gateway = OfflineGateway::new(db.clone());

        assert!(gateway.is_offline().await);
        assert!(!gateway.get_moods().await.success);
        assert!(!gateway.get_settings().await.success);
        assert_eq!(gateway.pending_sync_count().await, 0);

        // A failed write alone queues nothing; the caller decides to keep it.
        let draft = MoodDraft::new(MoodName::Tired, Intensity::new(2).unwrap());
        assert!(!gateway.create_mood(&draft).await.success);
        assert!(!gateway.update_settings(&SettingsPatch::default()).await.success);
        assert_eq!(gateway.pending_sync_count().await, 0);

        let entry = MoodEntry::local_from_draft(&draft);
        gateway.queue_mood(&entry).await;
        gateway.queue_settings(&SettingsPatch::default()).await;
        assert_eq!(gateway.pending_sync_count().await, 2);

        let pending = db.pending_writes().pending(10).await.unwrap();
        let mood = pending
            .iter()
            .find(|p| p.kind == PendingWriteKind::Mood)
            .unwrap();
        assert_eq!(mood.entity_id, entry.id);
        let queued: MoodEntry = serde_json::from_str(&mood.payload).unwrap();
        assert_eq!(queued, entry);

        gateway.sync_data().await;
        assert_eq!(gateway.pending_sync_count().await, 2);
    }

    #[tokio::test]
    async fn test_kept_mood_is_queued_under_its_visible_id() {
        let db = Database::new(CacheConfig::in_memory()).await.unwrap();
        let ctx = SyncContext::new(
            Store::new(),
            Arc::new(OfflineGateway::new(db.clone())),
            Arc::new(db.clone()),
            SyncTimings::default(),
        );

        let draft = MoodDraft::new(MoodName::Sad, Intensity::new(2).unwrap());
        let outcome = add_mood(&ctx, draft).await;
        let MutationOutcome::LocalFallback(entry) = outcome else {
            panic!("expected a local fallback, got {outcome:?}");
        };
        assert_eq!(ctx.store.snapshot().moods[0], entry);

        let pending = db.pending_writes().pending(10).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].entity_id, entry.id);
        let queued: MoodEntry = serde_json::from_str(&pending[0].payload).unwrap();
        assert_eq!(queued.timestamp, entry.timestamp);
        assert_eq!(queued, entry);
    }

    #[tokio::test]
    async fn test_kept_settings_are_queued() {
        let db = Database::new(CacheConfig::in_memory()).await.unwrap();
        let ctx = SyncContext::new(
            Store::new(),
            Arc::new(OfflineGateway::new(db.clone())),
            Arc::new(db.clone()),
            SyncTimings::default(),
        );

        let patch = SettingsPatch::default().with_display(DisplaySettings {
            theme: Theme::Dark,
            ..DisplaySettings::default()
        });
        update_settings(&ctx, patch.clone()).await;

        let pending = db.pending_writes().pending(10).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].kind, PendingWriteKind::Settings);
        let queued: SettingsPatch = serde_json::from_str(&pending[0].payload).unwrap();
        assert_eq!(queued, patch);
    }
}
