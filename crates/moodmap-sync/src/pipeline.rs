//! # Optimistic Mutation Pipeline
//!
//! Every user write lands in visible state, whether or not the remote store
//! accepted it.
//!
//! ## Outcomes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         add_mood(draft)                                 │
//! │                                                                         │
//! │  validate ──✗──► HardFailure      flash validation message, no change  │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  SetLoading(true) ─► gateway.create_mood                               │
//! │     │                                                                   │
//! │     ├── success + entry ──► RemoteConfirmed                            │
//! │     │       AppendMood(server entry), refresh status + last-sync       │
//! │     │                                                                   │
//! │     └── anything else ───► LocalFallback                               │
//! │             AppendMood(local-<uuid> entry), flash "saved locally" 3s   │
//! │             gateway.queue_mood(same entry)                             │
//! │                                                                         │
//! │  SetLoading(false), write-through                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `update_settings` follows the same shape without touching the loading
//! flag. A fallback merge is never rolled back.

use chrono::Utc;
use tracing::{debug, info, warn};

use moodmap_core::validation::validate_draft;
use moodmap_core::{
    Action, MoodDraft, MoodEntry, SettingsPatch, ValidationError, MSG_MOOD_SAVED_LOCALLY,
    MSG_SETTINGS_SAVED_LOCALLY,
};

use crate::context::SyncContext;
use crate::status::refresh_status;

/// What became of a write.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome<T> {
    /// The remote store accepted it; the value is its canonical version.
    RemoteConfirmed(T),
    /// Applied locally only; it waits for a later sync.
    LocalFallback(T),
    /// Rejected before any state change.
    HardFailure(ValidationError),
}

impl<T> MutationOutcome<T> {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, MutationOutcome::RemoteConfirmed(_))
    }

    /// The value that became visible, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            MutationOutcome::RemoteConfirmed(v) | MutationOutcome::LocalFallback(v) => Some(v),
            MutationOutcome::HardFailure(_) => None,
        }
    }
}

/// Logs a mood.
pub async fn add_mood(ctx: &SyncContext, mut draft: MoodDraft) -> MutationOutcome<MoodEntry> {
    if let Err(e) = validate_draft(&draft) {
        warn!(%e, "Rejected mood draft");
        ctx.store.flash(e.to_string(), ctx.timings.fallback_message);
        return MutationOutcome::HardFailure(e);
    }

    if draft.is_public.is_none() {
        let public = ctx
            .store
            .with_state_ref(|s| s.settings.privacy.public_by_default);
        draft.is_public = Some(public);
    }

    ctx.store.dispatch(Action::SetLoading(true));
    let response = ctx.gateway.create_mood(&draft).await;

    let outcome = match response.into_success_data() {
        Some(entry) => {
            debug!(id = %entry.id, "Mood confirmed by remote");
            ctx.store.dispatch(Action::AppendMood(entry.clone()));
            refresh_status(ctx, Some(Utc::now())).await;
            MutationOutcome::RemoteConfirmed(entry)
        }
        None => {
            let entry = MoodEntry::local_from_draft(&draft);
            info!(id = %entry.id, "Remote write failed, keeping mood locally");
            ctx.store.dispatch(Action::AppendMood(entry.clone()));
            ctx.store
                .flash(MSG_MOOD_SAVED_LOCALLY, ctx.timings.fallback_message);
            MutationOutcome::LocalFallback(entry)
        }
    };

    if !ctx.store.dispatch(Action::SetLoading(false)) {
        debug!("Session ended before the mood write resolved, result discarded");
        return outcome;
    }
    if let MutationOutcome::LocalFallback(entry) = &outcome {
        ctx.gateway.queue_mood(entry).await;
    }
    ctx.persist().await;
    outcome
}

/// Merges a partial settings update. Each group present replaces the
/// current group wholesale.
pub async fn update_settings(
    ctx: &SyncContext,
    patch: SettingsPatch,
) -> MutationOutcome<SettingsPatch> {
    let response = ctx.gateway.update_settings(&patch).await;

    let outcome = if response.success {
        let canonical = response.data.unwrap_or(patch);
        ctx.store.dispatch(Action::MergeSettings(canonical.clone()));
        refresh_status(ctx, Some(Utc::now())).await;
        MutationOutcome::RemoteConfirmed(canonical)
    } else {
        info!("Remote settings update failed, keeping change locally");
        ctx.store.dispatch(Action::MergeSettings(patch.clone()));
        ctx.store
            .flash(MSG_SETTINGS_SAVED_LOCALLY, ctx.timings.fallback_message);
        MutationOutcome::LocalFallback(patch)
    };

    if ctx.store.is_closed() {
        debug!("Session ended before the settings write resolved, result discarded");
        return outcome;
    }
    if let MutationOutcome::LocalFallback(patch) = &outcome {
        ctx.gateway.queue_settings(patch).await;
    }
    ctx.persist().await;
    outcome
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayResponse;
    use crate::testing::{entry_at, harness, MemoryCache, MockGateway};
    use moodmap_core::settings::{DisplaySettings, PrivacySettings, Theme};
    use moodmap_core::state::is_newest_first;
    use moodmap_core::{Intensity, Location, MoodName, UserSettings};
    use std::time::Duration;

    fn draft(name: MoodName, intensity: u8) -> MoodDraft {
        MoodDraft::new(name, Intensity::new(intensity).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmed_entry_is_prepended_exactly() {
        let mut server = entry_at(MoodName::Happy, 90);
        server.emoji = "😊".into();
        server.intensity = Intensity::new(4).unwrap();
        server.id = "srv-42".into();

        let gateway = MockGateway::new().with_created(server.clone());
        let ctx = harness(gateway, MemoryCache::new());
        ctx.store.dispatch(Action::AppendMood(entry_at(MoodName::Calm, 1)));
        let before = ctx.store.snapshot().moods.len();

        let outcome = add_mood(&ctx, draft(MoodName::Happy, 4).with_emoji("😊")).await;
        assert_eq!(outcome, MutationOutcome::RemoteConfirmed(server.clone()));

        let state = ctx.store.snapshot();
        assert_eq!(state.moods[0], server);
        assert_eq!(state.moods.len(), before + 1);
        assert!(!state.is_loading);
        assert!(state.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_create_keeps_entry_locally() {
        let gateway = MockGateway::new().failing_writes();
        let ctx = harness(gateway, MemoryCache::new());

        let outcome = add_mood(&ctx, draft(MoodName::Sad, 2).with_emoji("😢")).await;
        assert!(matches!(outcome, MutationOutcome::LocalFallback(_)));

        let state = ctx.store.snapshot();
        assert_eq!(state.moods[0].name, MoodName::Sad);
        assert_eq!(state.moods[0].emoji, "😢");
        assert_eq!(state.moods[0].intensity.value(), 2);
        assert!(state.moods[0].is_local());
        assert!(state.error.as_deref().unwrap().contains("saved locally"));
        assert!(!state.is_loading);

        tokio::time::sleep(Duration::from_millis(2_900)).await;
        assert!(ctx.store.snapshot().error.is_some());
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(ctx.store.snapshot().error.is_none());
        // The entry itself stays.
        assert_eq!(ctx.store.snapshot().moods.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_kept_writes_are_handed_to_the_gateway_queue() {
        let gateway = MockGateway::new().failing_writes();
        let ctx = harness(gateway.clone(), MemoryCache::new());
        add_mood(&ctx, draft(MoodName::Sad, 2)).await;
        update_settings(&ctx, SettingsPatch::default()).await;
        assert_eq!(gateway.call_count("queue_mood"), 1);
        assert_eq!(gateway.call_count("queue_settings"), 1);

        let gateway = MockGateway::new();
        let ctx = harness(gateway.clone(), MemoryCache::new());
        add_mood(&ctx, draft(MoodName::Happy, 4)).await;
        update_settings(&ctx, SettingsPatch::default()).await;
        assert_eq!(gateway.call_count("queue_mood"), 0);
        assert_eq!(gateway.call_count("queue_settings"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_adds_apply_in_resolution_order() {
        let gateway = MockGateway::new()
            .with_create_delays(vec![Duration::from_secs(3), Duration::from_secs(1)]);
        let ctx = harness(gateway, MemoryCache::new());

        let slow = {
            let ctx = ctx.clone();
            tokio::spawn(async move { add_mood(&ctx, draft(MoodName::Happy, 4)).await })
        };
        tokio::task::yield_now().await;
        let fast = {
            let ctx = ctx.clone();
            tokio::spawn(async move { add_mood(&ctx, draft(MoodName::Sad, 2)).await })
        };

        tokio::time::sleep(Duration::from_secs(2)).await;
        let state = ctx.store.snapshot();
        assert_eq!(state.moods.len(), 1);
        assert_eq!(state.moods[0].name, MoodName::Sad);

        let slow = slow.await.unwrap();
        let fast = fast.await.unwrap();
        assert!(slow.is_confirmed() && fast.is_confirmed());

        let state = ctx.store.snapshot();
        assert_eq!(state.moods.len(), 2);
        // The later resolution sits on top.
        assert_eq!(state.moods[0].name, MoodName::Happy);
        assert_eq!(state.moods[1].name, MoodName::Sad);
        assert_eq!(state.moods[0].id, "srv-2");
        assert_eq!(state.moods[1].id, "srv-1");
        assert!(!state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_without_payload_falls_back() {
        let gateway = MockGateway::new().with_create_response(GatewayResponse::ok_empty());
        let ctx = harness(gateway, MemoryCache::new());

        let outcome = add_mood(&ctx, draft(MoodName::Tired, 1)).await;
        let MutationOutcome::LocalFallback(entry) = outcome else {
            panic!("expected local fallback");
        };
        assert!(entry.is_local());
        assert_eq!(ctx.store.snapshot().moods[0], entry);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_adds_stay_newest_first() {
        let ctx = harness(MockGateway::new(), MemoryCache::new());
        for (i, name) in MoodName::ALL.iter().enumerate() {
            add_mood(&ctx, draft(*name, (i % 5) as u8 + 1)).await;
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        let moods = ctx.store.snapshot().moods;
        assert_eq!(moods.len(), MoodName::ALL.len());
        assert!(is_newest_first(&moods));
        assert_eq!(moods[0].name, MoodName::Grateful);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_mirrors_gateway_after_success() {
        let gateway = MockGateway::new().with_status(true, 7);
        let ctx = harness(gateway, MemoryCache::new());

        let started = Utc::now();
        let outcome = add_mood(&ctx, draft(MoodName::Excited, 5)).await;
        let created = outcome.value().unwrap().timestamp;

        let status = ctx.store.snapshot().sync_status;
        assert!(status.is_offline);
        assert_eq!(status.pending_sync_count, 7);
        let last = status.last_sync_time.unwrap();
        assert!(last >= started);
        assert!(last >= created);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_leaves_last_sync_untouched() {
        let ctx = harness(MockGateway::new().failing_writes(), MemoryCache::new());
        add_mood(&ctx, draft(MoodName::Angry, 3)).await;
        assert!(ctx.store.snapshot().sync_status.last_sync_time.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_draft_is_hard_failure() {
        let gateway = MockGateway::new();
        let ctx = harness(gateway.clone(), MemoryCache::new());

        let long_note = "x".repeat(501);
        let outcome = add_mood(&ctx, draft(MoodName::Calm, 3).with_note(long_note)).await;
        assert!(matches!(
            outcome,
            MutationOutcome::HardFailure(ValidationError::TooLong { .. })
        ));
        // Outcomes are handed to the UI by value.
        assert_eq!(outcome.clone(), outcome);

        let outcome = add_mood(
            &ctx,
            draft(MoodName::Calm, 3).with_location(Location::new(91.0, 0.0)),
        )
        .await;
        assert!(matches!(outcome, MutationOutcome::HardFailure(_)));

        let state = ctx.store.snapshot();
        assert!(state.moods.is_empty());
        assert!(!state.is_loading);
        assert!(state.error.is_some());
        assert_eq!(gateway.call_count("create_mood"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_visibility_defaults_from_privacy_settings() {
        let ctx = harness(MockGateway::new(), MemoryCache::new());
        ctx.store.dispatch(Action::MergeSettings(
            SettingsPatch::default().with_privacy(PrivacySettings {
                public_by_default: true,
                ..PrivacySettings::default()
            }),
        ));

        let outcome = add_mood(&ctx, draft(MoodName::Grateful, 5)).await;
        assert!(outcome.value().unwrap().is_public);

        let outcome = add_mood(&ctx, draft(MoodName::Grateful, 5).with_visibility(false)).await;
        assert!(!outcome.value().unwrap().is_public);
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_writes_through_to_cache() {
        let cache = MemoryCache::new();
        let ctx = harness(MockGateway::new().failing_writes(), cache.clone());

        let outcome = add_mood(&ctx, draft(MoodName::Anxious, 4)).await;
        let stored = cache.stored_moods().unwrap();
        assert_eq!(stored, vec![outcome.value().unwrap().clone()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_result_after_close_is_discarded() {
        let gateway = MockGateway::new().with_delay(Duration::from_secs(2));
        let cache = MemoryCache::new();
        let ctx = harness(gateway.clone(), cache.clone());

        let task = {
            let ctx = ctx.clone();
            tokio::spawn(async move { add_mood(&ctx, draft(MoodName::Happy, 3)).await })
        };
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(ctx.store.snapshot().is_loading);
        ctx.store.close();

        let outcome = task.await.unwrap();
        assert!(outcome.is_confirmed());
        assert!(ctx.store.snapshot().moods.is_empty());
        assert!(cache.stored_moods().is_none());
        assert_eq!(gateway.call_count("queue_mood"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settings_use_canonical_fragment() {
        let proposed = DisplaySettings {
            theme: Theme::Dark,
            ..DisplaySettings::default()
        };
        let canonical = DisplaySettings {
            theme: Theme::Dark,
            default_intensity: Intensity::new(4).unwrap(),
            auto_locate: true,
        };
        let gateway = MockGateway::new()
            .with_canonical_settings(SettingsPatch::default().with_display(canonical.clone()))
            .with_status(false, 2);
        let ctx = harness(gateway, MemoryCache::new());

        let outcome =
            update_settings(&ctx, SettingsPatch::default().with_display(proposed)).await;
        assert!(outcome.is_confirmed());

        let state = ctx.store.snapshot();
        assert_eq!(state.settings.display, canonical);
        assert_eq!(state.sync_status.pending_sync_count, 2);
        assert!(state.sync_status.last_sync_time.is_some());
        assert!(state.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_settings_update_is_kept() {
        let cache = MemoryCache::new();
        let ctx = harness(MockGateway::new().failing_writes(), cache.clone());

        let privacy = PrivacySettings {
            share_location: false,
            public_by_default: true,
            analytics: false,
        };
        let outcome =
            update_settings(&ctx, SettingsPatch::default().with_privacy(privacy.clone())).await;
        assert!(matches!(outcome, MutationOutcome::LocalFallback(_)));

        let state = ctx.store.snapshot();
        assert_eq!(state.settings.privacy, privacy);
        assert_eq!(state.settings.display, UserSettings::default().display);
        assert!(state.error.as_deref().unwrap().contains("saved locally"));
        assert!(!state.is_loading);

        tokio::time::sleep(Duration::from_secs(4)).await;
        let state = ctx.store.snapshot();
        assert!(state.error.is_none());
        assert_eq!(state.settings.privacy, privacy);
        assert_eq!(cache.stored_settings().unwrap().privacy, privacy);
    }
}
