//! # moodmap-core: Pure Domain Logic for Moodmap
//!
//! This crate holds everything about the mood log that can be expressed
//! without touching a disk, a socket or a clock-driven timer.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Moodmap Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              UI collaborators (map, journal, settings)          │   │
//! │  │        subscribe to AppState snapshots, call operations         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │      moodmap-sync (Store, Bootstrap, Pipeline, Tracker)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Action                                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ moodmap-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ settings  │  │   state   │  │ validation│  │   │
//! │  │   │ MoodEntry │  │ Settings  │  │  Action   │  │   draft   │  │   │
//! │  │   │ Intensity │  │   Patch   │  │  reduce() │  │   checks  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Mood entries, drafts, locations, sync status, auth fragment
//! - [`settings`] - User settings groups and the shallow-merge patch
//! - [`state`] - `AppState`, the closed `Action` set and `reduce`
//! - [`validation`] - Draft validation rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use moodmap_core::state::{reduce, Action, AppState};
//! use moodmap_core::types::{MoodDraft, MoodEntry, MoodName};
//! use moodmap_core::Intensity;
//!
//! let draft = MoodDraft::new(MoodName::Happy, Intensity::new(4).unwrap());
//! let entry = MoodEntry::local_from_draft(&draft);
//!
//! let state = reduce(AppState::default(), Action::AppendMood(entry.clone()));
//! assert_eq!(state.moods[0], entry);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod settings;
pub mod state;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use settings::{SettingsPatch, UserSettings};
pub use state::{reduce, Action, AppState};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Lowest accepted mood intensity.
pub const MIN_INTENSITY: u8 = 1;

/// Highest accepted mood intensity.
pub const MAX_INTENSITY: u8 = 5;

/// Intensity preselected for new entries when settings say nothing else.
pub const DEFAULT_INTENSITY: u8 = 3;

/// Maximum length of the free-text note on an entry.
pub const MAX_NOTE_LENGTH: usize = 500;

/// Prefix of identifiers generated on this device for local-only writes.
///
/// Server-issued identifiers never carry it, which is how a reader tells a
/// confirmed entry from one still waiting to be synchronized.
pub const LOCAL_ID_PREFIX: &str = "local-";

// =============================================================================
// User-Facing Messages
// =============================================================================
// These strings are part of the observable behavior; UI code and tests
// match on them.

/// Shown when bootstrap could not reach the remote store.
pub const MSG_WORKING_OFFLINE: &str = "Working offline - data will sync when connected";

/// Shown when a mood was kept locally because the remote write failed.
pub const MSG_MOOD_SAVED_LOCALLY: &str = "Mood saved locally - will sync when online";

/// Shown when a settings change was kept locally.
pub const MSG_SETTINGS_SAVED_LOCALLY: &str = "Settings saved locally - will sync when online";

/// Shown when neither the remote store nor the cache produced usable data.
pub const MSG_LOAD_FAILED: &str = "Failed to load data - showing defaults";

/// Shown (durably) when an explicit resync fails.
pub const MSG_SYNC_FAILED: &str = "Sync failed - please try again";
