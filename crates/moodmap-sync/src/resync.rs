//! Manual resync: push queued writes, then reload from the remote store.
//!
//! Unlike bootstrap there is no cache fallback. Remote data replaces local
//! data wholesale, even when it is empty. A failure leaves the current data
//! alone and sets a durable message that only a later successful resync
//! clears.

use chrono::Utc;
use tracing::{info, warn};

use moodmap_core::{Action, UserSettings, MSG_SYNC_FAILED};

use crate::context::SyncContext;
use crate::status::refresh_status;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResyncOutcome {
    Synced { moods: usize },
    Failed,
}

impl ResyncOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, ResyncOutcome::Synced { .. })
    }
}

pub async fn resync(ctx: &SyncContext) -> ResyncOutcome {
    info!(gateway = ctx.gateway.name(), "Manual resync requested");
    ctx.store.dispatch(Action::SetLoading(true));

    ctx.gateway.sync_data().await;
    let (moods_res, settings_res) =
        tokio::join!(ctx.gateway.get_moods(), ctx.gateway.get_settings());

    let outcome = if moods_res.success && settings_res.success {
        let moods = moods_res.data.unwrap_or_default();
        let count = moods.len();
        let settings = UserSettings::from_patch(settings_res.data.unwrap_or_default());

        ctx.store.dispatch(Action::ReplaceAllData { moods, settings });
        refresh_status(ctx, Some(Utc::now())).await;
        let stale = ctx
            .store
            .with_state_ref(|s| s.error.as_deref() == Some(MSG_SYNC_FAILED));
        if stale {
            ctx.store.dispatch(Action::ClearError);
        }
        ResyncOutcome::Synced { moods: count }
    } else {
        warn!(
            moods_ok = moods_res.success,
            settings_ok = settings_res.success,
            "Resync failed"
        );
        ctx.store.dispatch(Action::SetError(MSG_SYNC_FAILED.to_string()));
        ResyncOutcome::Failed
    };

    ctx.store.dispatch(Action::SetLoading(false));
    if outcome.is_synced() {
        ctx.persist().await;
    }
    info!(?outcome, "Resync finished");
    outcome
}
