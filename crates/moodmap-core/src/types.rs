//! # Domain Types
//!
//! Core domain types used throughout Moodmap.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   MoodEntry     │   │   MoodDraft     │   │   SyncStatus    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  emoji          │   │  is_offline     │       │
//! │  │  emoji, name    │   │  name           │   │  pending count  │       │
//! │  │  intensity 1..5 │   │  intensity      │   │  last_sync_time │       │
//! │  │  note?          │   │  note?          │   └─────────────────┘       │
//! │  │  timestamp      │   │  location?      │                             │
//! │  │  location       │   │  is_public?     │   ┌─────────────────┐       │
//! │  │  is_public      │   └─────────────────┘   │   AuthState     │       │
//! │  └─────────────────┘                         │  (pass-through) │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Server-confirmed entries carry the identifier the remote store issued.
//! Entries created while the remote write failed carry a client identifier
//! prefixed with [`LOCAL_ID_PREFIX`](crate::LOCAL_ID_PREFIX).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, ValidationError};
use crate::{DEFAULT_INTENSITY, LOCAL_ID_PREFIX, MAX_INTENSITY, MIN_INTENSITY};

// =============================================================================
// Intensity
// =============================================================================

/// Mood intensity on a 1..=5 scale.
///
/// The only way to build one is through [`Intensity::new`] (or serde, which
/// goes through the same check), so every `Intensity` in memory is in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Intensity(u8);

impl Intensity {
    /// Creates an intensity, rejecting values outside 1..=5.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (MIN_INTENSITY..=MAX_INTENSITY).contains(&value) {
            Ok(Intensity(value))
        } else {
            Err(ValidationError::OutOfRange {
                field: "intensity".to_string(),
                min: MIN_INTENSITY as i64,
                max: MAX_INTENSITY as i64,
            })
        }
    }

    /// Returns the raw value.
    #[inline]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Intensity(DEFAULT_INTENSITY)
    }
}

impl TryFrom<u8> for Intensity {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Intensity::new(value)
    }
}

impl From<Intensity> for u8 {
    fn from(intensity: Intensity) -> Self {
        intensity.0
    }
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Mood Vocabulary
// =============================================================================

/// The fixed mood vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum MoodName {
    Happy,
    Sad,
    Angry,
    Anxious,
    Calm,
    Excited,
    Tired,
    Grateful,
}

impl MoodName {
    /// Every mood in display order.
    pub const ALL: [MoodName; 8] = [
        MoodName::Happy,
        MoodName::Sad,
        MoodName::Angry,
        MoodName::Anxious,
        MoodName::Calm,
        MoodName::Excited,
        MoodName::Tired,
        MoodName::Grateful,
    ];

    /// Default glyph shown for this mood.
    pub fn emoji(&self) -> &'static str {
        match self {
            MoodName::Happy => "😊",
            MoodName::Sad => "😢",
            MoodName::Angry => "😠",
            MoodName::Anxious => "😰",
            MoodName::Calm => "😌",
            MoodName::Excited => "🤩",
            MoodName::Tired => "😴",
            MoodName::Grateful => "🙏",
        }
    }

    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodName::Happy => "happy",
            MoodName::Sad => "sad",
            MoodName::Angry => "angry",
            MoodName::Anxious => "anxious",
            MoodName::Calm => "calm",
            MoodName::Excited => "excited",
            MoodName::Tired => "tired",
            MoodName::Grateful => "grateful",
        }
    }
}

impl std::fmt::Display for MoodName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MoodName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        MoodName::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| CoreError::UnknownMood(s.to_string()))
    }
}

// =============================================================================
// Location
// =============================================================================

/// Where an entry was logged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Human-readable address label, if reverse geocoding produced one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Location {
            latitude,
            longitude,
            address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

// =============================================================================
// Mood Entry
// =============================================================================

/// One logged emotional data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    /// Server-issued id, or `local-<uuid>` for local-only writes.
    pub id: String,

    /// Emoji glyph shown on the map marker.
    pub emoji: String,

    pub name: MoodName,

    #[ts(type = "number")]
    pub intensity: Intensity,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Creation time. Serialized as an RFC 3339 string.
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,

    pub location: Location,

    /// Visible to other users when true.
    #[serde(default)]
    pub is_public: bool,
}

impl MoodEntry {
    /// Builds a local-only entry from a draft, stamped with the current time.
    pub fn local_from_draft(draft: &MoodDraft) -> Self {
        Self::local_from_draft_at(draft, Utc::now())
    }

    /// Builds a local-only entry from a draft with an explicit timestamp.
    pub fn local_from_draft_at(draft: &MoodDraft, timestamp: DateTime<Utc>) -> Self {
        MoodEntry {
            id: format!("{}{}", LOCAL_ID_PREFIX, Uuid::new_v4()),
            emoji: draft.emoji.clone(),
            name: draft.name,
            intensity: draft.intensity,
            note: draft.note.clone(),
            timestamp,
            location: draft.location.clone().unwrap_or_default(),
            is_public: draft.is_public.unwrap_or(false),
        }
    }

    /// True when the id was generated on this device.
    pub fn is_local(&self) -> bool {
        self.id.starts_with(LOCAL_ID_PREFIX)
    }
}

// =============================================================================
// Mood Draft
// =============================================================================

/// The fields a user supplies when logging a mood.
///
/// Identifier and timestamp are assigned by whoever accepts the write: the
/// remote store on success, this device on fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MoodDraft {
    pub emoji: String,
    pub name: MoodName,
    #[ts(type = "number")]
    pub intensity: Intensity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// `None` means "use the privacy default from settings".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl MoodDraft {
    /// Creates a draft with the mood's default glyph.
    pub fn new(name: MoodName, intensity: Intensity) -> Self {
        MoodDraft {
            emoji: name.emoji().to_string(),
            name,
            intensity,
            note: None,
            location: None,
            is_public: None,
        }
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = emoji.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_visibility(mut self, is_public: bool) -> Self {
        self.is_public = Some(is_public);
        self
    }
}

// =============================================================================
// Sync Status
// =============================================================================

/// Derived connectivity/queue-depth summary.
///
/// Always recomputed from the gateway; only `last_sync_time` is stamped by
/// this device after a confirmed operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub is_offline: bool,
    pub pending_sync_count: u32,
    #[ts(as = "Option<String>")]
    pub last_sync_time: Option<DateTime<Utc>>,
}

/// Partial update folded into [`SyncStatus`]. `None` keeps the current value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyncStatusPatch {
    pub is_offline: Option<bool>,
    pub pending_sync_count: Option<u32>,
    pub last_sync_time: Option<DateTime<Utc>>,
}

impl SyncStatusPatch {
    /// A poll result: connectivity and queue depth, last-sync untouched.
    pub fn polled(is_offline: bool, pending_sync_count: u32) -> Self {
        SyncStatusPatch {
            is_offline: Some(is_offline),
            pending_sync_count: Some(pending_sync_count),
            last_sync_time: None,
        }
    }

    /// A confirmed operation: poll result plus a fresh last-sync stamp.
    pub fn confirmed(is_offline: bool, pending_sync_count: u32, at: DateTime<Utc>) -> Self {
        SyncStatusPatch {
            last_sync_time: Some(at),
            ..Self::polled(is_offline, pending_sync_count)
        }
    }
}

// =============================================================================
// Navigation
// =============================================================================

/// Top-level tab the UI is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Map,
    Journal,
    Insights,
    Settings,
}

// =============================================================================
// Auth Fragment
// =============================================================================

/// Signed-in user as reported by the auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Auth fragment carried on state. Mutation logic never reads it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub is_authenticated: bool,
    pub user: Option<UserProfile>,
}

// =============================================================================
// Unit Tests
// =============================================================================
