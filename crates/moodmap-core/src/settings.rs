//! # User Settings
//!
//! Preference groups and the patch type used to change them.
//!
//! ## Merge Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Shallow Merge Over Groups                           │
//! │                                                                         │
//! │  current:  { notifications: N, privacy: P,  display: D, account: A }   │
//! │  patch:    {                   privacy: P'                        }    │
//! │                                     │                                   │
//! │                                     ▼                                   │
//! │  result:   { notifications: N, privacy: P', display: D, account: A }   │
//! │                                                                         │
//! │  P' REPLACES P. Sub-keys of P absent from P' are NOT carried over,     │
//! │  so callers always send whole groups.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::types::Intensity;

// =============================================================================
// Groups
// =============================================================================

/// Reminder and digest preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub enabled: bool,
    pub daily_reminder: bool,
    /// Local wall-clock time, `HH:MM`.
    pub reminder_time: String,
    pub weekly_summary: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        NotificationSettings {
            enabled: true,
            daily_reminder: true,
            reminder_time: "20:00".to_string(),
            weekly_summary: false,
        }
    }
}

/// What leaves the device and who can see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    pub share_location: bool,
    /// Visibility applied to drafts that do not choose one.
    pub public_by_default: bool,
    pub analytics: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        PrivacySettings {
            share_location: true,
            public_by_default: false,
            analytics: false,
        }
    }
}

/// Color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl std::str::FromStr for Theme {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" | "auto" => Ok(Theme::System),
            _ => Err(CoreError::UnknownTheme(s.to_string())),
        }
    }
}

/// Presentation preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettings {
    pub theme: Theme,
    /// Intensity preselected in the entry form.
    #[ts(type = "number")]
    pub default_intensity: Intensity,
    /// Fill the location from the device when logging.
    pub auto_locate: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            theme: Theme::System,
            default_intensity: Intensity::default(),
            auto_locate: true,
        }
    }
}

/// Account info fragment mirrored from the remote profile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AccountSettings {
    pub display_name: Option<String>,
    pub email: Option<String>,
    #[ts(as = "Option<String>")]
    pub member_since: Option<DateTime<Utc>>,
}

// =============================================================================
// User Settings
// =============================================================================

/// The full settings object.
///
/// Every group defaults independently, so a cached object missing a group
/// deserializes with that group at its built-in default.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub notifications: NotificationSettings,
    pub privacy: PrivacySettings,
    pub display: DisplaySettings,
    pub account: AccountSettings,
}

impl UserSettings {
    /// Applies a patch in place, replacing every group the patch carries.
    pub fn merge(&mut self, patch: SettingsPatch) {
        if let Some(notifications) = patch.notifications {
            self.notifications = notifications;
        }
        if let Some(privacy) = patch.privacy {
            self.privacy = privacy;
        }
        if let Some(display) = patch.display {
            self.display = display;
        }
        if let Some(account) = patch.account {
            self.account = account;
        }
    }

    /// Returns a copy of `self` with `patch` merged over it.
    pub fn overlaid(mut self, patch: SettingsPatch) -> Self {
        self.merge(patch);
        self
    }

    /// Built-in defaults overlaid by a fragment.
    pub fn from_patch(patch: SettingsPatch) -> Self {
        UserSettings::default().overlaid(patch)
    }
}

// =============================================================================
// Settings Patch
// =============================================================================

/// A partial settings object: each present group is a whole replacement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<NotificationSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy: Option<PrivacySettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplaySettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountSettings>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.notifications.is_none()
            && self.privacy.is_none()
            && self.display.is_none()
            && self.account.is_none()
    }

    pub fn with_notifications(mut self, group: NotificationSettings) -> Self {
        self.notifications = Some(group);
        self
    }

    pub fn with_privacy(mut self, group: PrivacySettings) -> Self {
        self.privacy = Some(group);
        self
    }

    pub fn with_display(mut self, group: DisplaySettings) -> Self {
        self.display = Some(group);
        self
    }

    pub fn with_account(mut self, group: AccountSettings) -> Self {
        self.account = Some(group);
        self
    }
}

impl From<UserSettings> for SettingsPatch {
    fn from(settings: UserSettings) -> Self {
        SettingsPatch {
            notifications: Some(settings.notifications),
            privacy: Some(settings.privacy),
            display: Some(settings.display),
            account: Some(settings.account),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
