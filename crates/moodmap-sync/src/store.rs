//! # State Store
//!
//! The single owner of [`AppState`]. Every change goes through
//! [`Store::dispatch`], which runs the pure `reduce` and publishes the
//! result to subscribers.
//!
//! ## Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              Store                                      │
//! │                                                                         │
//! │  bootstrap ─┐                                                           │
//! │  pipeline  ─┼──► dispatch(action) ──► reduce ──► watch::Sender<AppState>│
//! │  tracker   ─┤         │                               │                 │
//! │  resync    ─┘         │ closed? → dropped             ▼                 │
//! │                       │                     subscribe() / snapshot()    │
//! │                       ▼                                                 │
//! │  flash(msg, delay) ── SetError(msg) now, ClearError after delay if no  │
//! │                       other message replaced it in between              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handles are cheap clones of one shared store. Timers hold a weak
//! reference, so a dropped store is never kept alive by a pending clear.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, trace};

use moodmap_core::{reduce, Action, AppState};

struct StoreInner {
    state_tx: watch::Sender<AppState>,
    /// Bumped on every SetError / ClearError.
    message_seq: AtomicU64,
    closed: AtomicBool,
}

impl StoreInner {
    fn apply(&self, action: Action) -> Option<u64> {
        if self.closed.load(Ordering::Acquire) {
            debug!(action = action.kind(), "Store closed, dropping action");
            return None;
        }

        trace!(action = action.kind(), "Dispatching");
        let mut seq = 0;
        self.state_tx.send_modify(|state| {
            if matches!(action, Action::SetError(_) | Action::ClearError) {
                seq = self.message_seq.fetch_add(1, Ordering::AcqRel) + 1;
            } else {
                seq = self.message_seq.load(Ordering::Acquire);
            }
            *state = reduce(std::mem::take(state), action);
        });
        Some(seq)
    }
}

/// Shared handle to the state store.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// A store holding the default (empty) state.
    pub fn new() -> Self {
        Self::with_state(AppState::default())
    }

    pub fn with_state(state: AppState) -> Self {
        let (state_tx, _) = watch::channel(state);
        Store {
            inner: Arc::new(StoreInner {
                state_tx,
                message_seq: AtomicU64::new(0),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Applies `action`. Returns false if the store is closed.
    pub fn dispatch(&self, action: Action) -> bool {
        self.inner.apply(action).is_some()
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> AppState {
        self.inner.state_tx.borrow().clone()
    }

    /// Reads the current state without cloning it.
    pub fn with_state_ref<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.inner.state_tx.borrow())
    }

    /// Receiver that sees every published state.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.inner.state_tx.subscribe()
    }

    /// Shows `message` now and clears it after `delay`, unless another
    /// message was set or cleared in the meantime.
    pub fn flash(&self, message: impl Into<String>, delay: Duration) {
        let Some(seq) = self.inner.apply(Action::SetError(message.into())) else {
            return;
        };

        let weak: Weak<StoreInner> = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if inner.message_seq.load(Ordering::Acquire) == seq {
                inner.apply(Action::ClearError);
            } else {
                trace!("Message replaced before its timer fired");
            }
        });
    }

    /// Stops accepting actions. Late results from in-flight calls are
    /// dropped from here on.
    pub fn close(&self) {
        if !self.inner.closed.swap(true, Ordering::AcqRel) {
            debug!("Store closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use moodmap_core::{Intensity, MoodDraft, MoodEntry, MoodName, Tab};

    #[tokio::test]
    async fn test_dispatch_and_subscribe() {
        let store = Store::new();
        let mut rx = store.subscribe();

        let entry = MoodEntry::local_from_draft(&MoodDraft::new(
            MoodName::Happy,
            Intensity::new(4).unwrap(),
        ));
        assert!(store.dispatch(Action::AppendMood(entry.clone())));

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().moods[0], entry);
        assert_eq!(store.snapshot().moods.len(), 1);
    }

    #[tokio::test]
    async fn test_closed_store_drops_actions() {
        let store = Store::new();
        store.close();
        assert!(store.is_closed());
        assert!(!store.dispatch(Action::SetTab(Tab::Journal)));
        assert_eq!(store.snapshot().current_tab, Tab::Map);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flash_clears_after_delay() {
        let store = Store::new();
        store.flash("hello", Duration::from_secs(3));
        assert_eq!(store.snapshot().error.as_deref(), Some("hello"));

        tokio::time::sleep(Duration::from_millis(2_900)).await;
        assert_eq!(store.snapshot().error.as_deref(), Some("hello"));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(store.snapshot().error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flash_does_not_clear_newer_message() {
        let store = Store::new();
        store.flash("first", Duration::from_secs(3));
        tokio::time::sleep(Duration::from_secs(1)).await;
        store.dispatch(Action::SetError("durable".into()));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(store.snapshot().error.as_deref(), Some("durable"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reflash_extends_same_message() {
        let store = Store::new();
        store.flash("saved", Duration::from_secs(3));
        tokio::time::sleep(Duration::from_secs(2)).await;
        store.flash("saved", Duration::from_secs(3));

        // First timer fires at 3s but the second flash superseded it.
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(store.snapshot().error.as_deref(), Some("saved"));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(store.snapshot().error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flash_after_close_is_ignored() {
        let store = Store::new();
        store.close();
        store.flash("late", Duration::from_secs(1));
        assert!(store.snapshot().error.is_none());
    }
}
