//! # App State and Transitions
//!
//! The view-model tree and the only function allowed to change it.
//!
//! ## Transition Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    reduce(state, action) -> state                       │
//! │                                                                         │
//! │  Action               Effect                                           │
//! │  ──────               ──────                                           │
//! │  AppendMood(e)        moods = [e, ..moods]                             │
//! │  MergeSettings(p)     settings = settings ⊕ p   (shallow, per group)   │
//! │  SetTab(t)            current_tab = t                                  │
//! │  SetLoading(b)        is_loading = b                                   │
//! │  SetError(m)          error = Some(m)                                  │
//! │  ClearError           error = None                                     │
//! │  ReplaceAllData{..}   moods, settings replaced; moods newest-first     │
//! │  UpdateSyncStatus(p)  sync_status = sync_status ⊕ p                    │
//! │  SetAuth(b)           auth.is_authenticated = b                        │
//! │  SetUser(u)           auth.user = u                                    │
//! │                                                                         │
//! │  Every transition is total: no action is ever rejected.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering
//! Moods are kept newest-first. `AppendMood` prepends and
//! `ReplaceAllData` sorts, so every path that builds the list preserves the
//! order without a separate fix-up pass.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::settings::{SettingsPatch, UserSettings};
use crate::types::{AuthState, MoodEntry, SyncStatus, SyncStatusPatch, Tab, UserProfile};

// =============================================================================
// App State
// =============================================================================

/// The aggregate root of the view model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Mood log, newest first.
    pub moods: Vec<MoodEntry>,
    pub settings: UserSettings,
    pub current_tab: Tab,
    pub is_loading: bool,
    /// User-facing message: transient warnings and durable failures.
    pub error: Option<String>,
    pub sync_status: SyncStatus,
    pub auth: AuthState,
}

// =============================================================================
// Actions
// =============================================================================

/// The closed set of state transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AppendMood(MoodEntry),
    MergeSettings(SettingsPatch),
    SetTab(Tab),
    SetLoading(bool),
    SetError(String),
    ClearError,
    ReplaceAllData {
        moods: Vec<MoodEntry>,
        settings: UserSettings,
    },
    UpdateSyncStatus(SyncStatusPatch),
    SetAuth(bool),
    SetUser(Option<UserProfile>),
}

impl Action {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::AppendMood(_) => "append_mood",
            Action::MergeSettings(_) => "merge_settings",
            Action::SetTab(_) => "set_tab",
            Action::SetLoading(_) => "set_loading",
            Action::SetError(_) => "set_error",
            Action::ClearError => "clear_error",
            Action::ReplaceAllData { .. } => "replace_all_data",
            Action::UpdateSyncStatus(_) => "update_sync_status",
            Action::SetAuth(_) => "set_auth",
            Action::SetUser(_) => "set_user",
        }
    }
}

// =============================================================================
// Transition Function
// =============================================================================

/// Maps `(state, action)` to the next state.
pub fn reduce(mut state: AppState, action: Action) -> AppState {
    match action {
        Action::AppendMood(entry) => {
            state.moods.insert(0, entry);
        }
        Action::MergeSettings(patch) => {
            state.settings.merge(patch);
        }
        Action::SetTab(tab) => {
            state.current_tab = tab;
        }
        Action::SetLoading(is_loading) => {
            state.is_loading = is_loading;
        }
        Action::SetError(message) => {
            state.error = Some(message);
        }
        Action::ClearError => {
            state.error = None;
        }
        Action::ReplaceAllData {
            mut moods,
            settings,
        } => {
            sort_newest_first(&mut moods);
            state.moods = moods;
            state.settings = settings;
        }
        Action::UpdateSyncStatus(patch) => {
            let status = &mut state.sync_status;
            if let Some(is_offline) = patch.is_offline {
                status.is_offline = is_offline;
            }
            if let Some(count) = patch.pending_sync_count {
                status.pending_sync_count = count;
            }
            if let Some(at) = patch.last_sync_time {
                status.last_sync_time = Some(at);
            }
        }
        Action::SetAuth(is_authenticated) => {
            state.auth.is_authenticated = is_authenticated;
        }
        Action::SetUser(user) => {
            state.auth.user = user;
        }
    }
    state
}

/// Stable sort, newest first. Entries with equal timestamps keep their
/// relative order.
pub fn sort_newest_first(moods: &mut [MoodEntry]) {
    moods.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// True when `moods` is ordered newest-first.
pub fn is_newest_first(moods: &[MoodEntry]) -> bool {
    moods.windows(2).all(|w| w[0].timestamp >= w[1].timestamp)
}

// =============================================================================
// Unit Tests
// =============================================================================
