//! # Mood Session
//!
//! Process-scoped owner of the store and its background work. The entry
//! point builds one, hands its store to whatever renders state, and shuts
//! it down on exit.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          MoodSession                                    │
//! │                                                                         │
//! │  start(config, gateway, cache)                                          │
//! │    validate config ─► Store::new ─► bootstrap ─► StatusTracker::spawn   │
//! │                                                                         │
//! │  running                                                                │
//! │    add_mood / update_settings / resync / set_tab / set_auth / set_user  │
//! │    subscribe() / snapshot()                                             │
//! │                                                                         │
//! │  shutdown()                                                             │
//! │    stop tracker (awaited) ─► close store ─► late results dropped       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

use moodmap_core::{Action, AppState, MoodDraft, MoodEntry, SettingsPatch, Tab, UserProfile};

use crate::bootstrap::{bootstrap, BootstrapReport};
use crate::cache::MoodCache;
use crate::config::SyncConfig;
use crate::context::SyncContext;
use crate::error::SyncResult;
use crate::gateway::RemoteGateway;
use crate::pipeline::{self, MutationOutcome};
use crate::resync::{self, ResyncOutcome};
use crate::status::{poll_once, StatusTracker, StatusTrackerHandle};
use crate::store::Store;

pub struct MoodSession {
    ctx: SyncContext,
    tracker: Option<StatusTrackerHandle>,
    report: BootstrapReport,
    device_id: String,
}

impl MoodSession {
    /// Bootstraps state and starts status polling.
    pub async fn start(
        config: &SyncConfig,
        gateway: Arc<dyn RemoteGateway>,
        cache: Arc<dyn MoodCache>,
    ) -> SyncResult<Self> {
        config.validate()?;
        info!(
            device_id = %config.device_id(),
            mode = ?config.mode(),
            gateway = gateway.name(),
            "Starting mood session"
        );

        let ctx = SyncContext::new(Store::new(), gateway, cache, config.timings());
        let report = bootstrap(&ctx).await;
        let tracker = StatusTracker::spawn(ctx.clone());

        Ok(MoodSession {
            ctx,
            tracker: Some(tracker),
            report,
            device_id: config.device_id().to_string(),
        })
    }

    pub fn store(&self) -> &Store {
        &self.ctx.store
    }

    pub fn snapshot(&self) -> AppState {
        self.ctx.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.ctx.store.subscribe()
    }

    pub fn bootstrap_report(&self) -> &BootstrapReport {
        &self.report
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub async fn add_mood(&self, draft: MoodDraft) -> MutationOutcome<MoodEntry> {
        pipeline::add_mood(&self.ctx, draft).await
    }

    pub async fn update_settings(&self, patch: SettingsPatch) -> MutationOutcome<SettingsPatch> {
        pipeline::update_settings(&self.ctx, patch).await
    }

    pub async fn resync(&self) -> ResyncOutcome {
        resync::resync(&self.ctx).await
    }

    /// Polls the gateway now instead of waiting for the next tick.
    pub async fn refresh_status(&self) {
        poll_once(&self.ctx).await;
    }

    pub fn set_tab(&self, tab: Tab) {
        self.ctx.store.dispatch(Action::SetTab(tab));
    }

    /// Mirrors the auth collaborator's view onto state.
    pub fn set_auth(&self, is_authenticated: bool) {
        self.ctx.store.dispatch(Action::SetAuth(is_authenticated));
    }

    pub fn set_user(&self, user: Option<UserProfile>) {
        self.ctx.store.dispatch(Action::SetUser(user));
    }

    /// Stops polling and closes the store.
    pub async fn shutdown(mut self) -> SyncResult<()> {
        info!("Shutting down mood session");
        let stopped = match self.tracker.take() {
            Some(tracker) => tracker.shutdown().await,
            None => Ok(()),
        };
        self.ctx.store.close();
        info!("Mood session stopped");
        stopped
    }
}

impl Drop for MoodSession {
    fn drop(&mut self) {
        // Dropped without shutdown(): the tracker sees the closed store on
        // its next tick and exits.
        self.ctx.store.close();
    }
}

impl std::fmt::Debug for MoodSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoodSession")
            .field("device_id", &self.device_id)
            .field("ctx", &self.ctx)
            .field("report", &self.report)
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
