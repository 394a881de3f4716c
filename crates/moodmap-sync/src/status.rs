//! # Sync Status Tracker
//!
//! Keeps `AppState::sync_status` in step with the gateway's view of
//! connectivity and queue depth.
//!
//! ## Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         StatusTracker::run                              │
//! │                                                                         │
//! │  loop {                                                                 │
//! │    select! {                                                            │
//! │      interval.tick()   ──► poll_once: is_offline + pending_sync_count  │
//! │                            ──► UpdateSyncStatus (last-sync untouched)  │
//! │      shutdown_rx.recv() ──► break                                      │
//! │    }                                                                    │
//! │  }                                                                      │
//! │                                                                         │
//! │  • First tick fires immediately (poll on start)                        │
//! │  • Poll interval: 10 seconds (configurable)                            │
//! │  • Stops on its own once the store is closed                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The loop runs on its own task and never holds anything the mutation
//! pipeline waits on.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use moodmap_core::{Action, SyncStatusPatch};

use crate::context::SyncContext;
use crate::error::{SyncError, SyncResult};

/// Shortest poll period the tracker accepts.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Reads the gateway's status and folds it into state. `confirmed_at`
/// stamps a fresh last-sync time; `None` keeps the current one.
pub async fn refresh_status(ctx: &SyncContext, confirmed_at: Option<DateTime<Utc>>) {
    let (is_offline, pending) = tokio::join!(
        ctx.gateway.is_offline(),
        ctx.gateway.pending_sync_count()
    );
    let patch = match confirmed_at {
        Some(at) => SyncStatusPatch::confirmed(is_offline, pending, at),
        None => SyncStatusPatch::polled(is_offline, pending),
    };
    trace!(is_offline, pending, "Sync status refreshed");
    ctx.store.dispatch(Action::UpdateSyncStatus(patch));
}

/// One tracker poll.
pub async fn poll_once(ctx: &SyncContext) {
    refresh_status(ctx, None).await;
}

// =============================================================================
// Tracker
// =============================================================================

/// Periodic status poller.
pub struct StatusTracker {
    ctx: SyncContext,
    shutdown_rx: mpsc::Receiver<()>,
}

/// Stop handle of a running tracker.
#[derive(Debug)]
pub struct StatusTrackerHandle {
    shutdown_tx: mpsc::Sender<()>,
    join: JoinHandle<()>,
}

impl StatusTracker {
    /// Spawns the tracker on the current runtime.
    pub fn spawn(ctx: SyncContext) -> StatusTrackerHandle {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let tracker = StatusTracker { ctx, shutdown_rx };
        let join = tokio::spawn(tracker.run());
        StatusTrackerHandle { shutdown_tx, join }
    }

    async fn run(mut self) {
        let configured = self.ctx.timings.status_poll_interval;
        let period = configured.max(MIN_POLL_INTERVAL);
        if period != configured {
            warn!(?configured, ?period, "Poll interval too short, clamped");
        }
        info!(?period, "Status tracker starting");

        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if self.ctx.store.is_closed() {
                        debug!("Store closed, status tracker exiting");
                        break;
                    }
                    poll_once(&self.ctx).await;
                }

                _ = self.shutdown_rx.recv() => {
                    info!("Status tracker shutting down");
                    break;
                }
            }
        }

        info!("Status tracker stopped");
    }
}

impl StatusTrackerHandle {
    /// Stops the loop and waits for it to exit. No poll result is applied
    /// after this returns.
    pub async fn shutdown(self) -> SyncResult<()> {
        if self.shutdown_tx.send(()).await.is_err() {
            debug!("Status tracker already stopped");
        }
        self.join
            .await
            .map_err(|e| SyncError::Internal(format!("Status tracker task failed: {e}")))
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
