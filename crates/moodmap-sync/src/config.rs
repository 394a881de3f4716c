//! # Sync Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MOODMAP_SYNC_MODE=offline                                          │
//! │     MOODMAP_CACHE_PATH=/tmp/moodmap.db                                 │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/moodmap/moodmap.toml (Linux)                             │
//! │     ~/Library/Application Support/app.moodmap.moodmap/ (macOS)         │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     SyncMode::Online, 10s poll, 5s / 3s message delays                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [device]
//! id = "550e8400-e29b-41d4-a716-446655440000"
//! name = "Phone"
//!
//! [sync]
//! mode = "online"  # online | offline
//! status_poll_interval_secs = 10
//! bootstrap_warning_secs = 5
//! fallback_message_secs = 3
//!
//! [cache]
//! path = "/var/lib/moodmap/moodmap.db"
//! max_connections = 4
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{SyncError, SyncResult};

const CONFIG_FILE_NAME: &str = "moodmap.toml";
const CACHE_FILE_NAME: &str = "moodmap.db";

// =============================================================================
// Sync Mode
// =============================================================================

/// Whether this device talks to the remote store at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Use the linked remote gateway.
    #[default]
    Online,

    /// Remote disabled: every write is kept locally and queued.
    Offline,
}

impl SyncMode {
    pub fn is_remote_enabled(&self) -> bool {
        matches!(self, SyncMode::Online)
    }
}

impl std::fmt::Display for SyncMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncMode::Online => write!(f, "online"),
            SyncMode::Offline => write!(f, "offline"),
        }
    }
}

impl std::str::FromStr for SyncMode {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "online" | "auto" => Ok(SyncMode::Online),
            "offline" | "disabled" | "local" => Ok(SyncMode::Offline),
            other => Err(SyncError::InvalidConfig(format!(
                "Unknown sync mode: '{}'. Valid options: online, offline",
                other
            ))),
        }
    }
}

// =============================================================================
// Device Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Generated on first run if not provided.
    pub id: String,

    #[serde(default = "default_device_name")]
    pub name: String,
}

fn default_device_name() -> String {
    "Moodmap Device".to_string()
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            id: Uuid::new_v4().to_string(),
            name: default_device_name(),
        }
    }
}

// =============================================================================
// Sync Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    #[serde(default)]
    pub mode: SyncMode,

    /// Seconds between sync-status polls.
    #[serde(default = "default_poll_interval")]
    pub status_poll_interval_secs: u64,

    /// Seconds the "working offline" bootstrap warning stays up.
    #[serde(default = "default_bootstrap_warning")]
    pub bootstrap_warning_secs: u64,

    /// Seconds a "saved locally" message stays up.
    #[serde(default = "default_fallback_message")]
    pub fallback_message_secs: u64,
}

fn default_poll_interval() -> u64 {
    10
}
fn default_bootstrap_warning() -> u64 {
    5
}
fn default_fallback_message() -> u64 {
    3
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings {
            mode: SyncMode::default(),
            status_poll_interval_secs: default_poll_interval(),
            bootstrap_warning_secs: default_bootstrap_warning(),
            fallback_message_secs: default_fallback_message(),
        }
    }
}

/// The sync settings as durations, ready for timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncTimings {
    pub status_poll_interval: Duration,
    pub bootstrap_warning: Duration,
    pub fallback_message: Duration,
}

impl Default for SyncTimings {
    fn default() -> Self {
        SyncTimings::from(&SyncSettings::default())
    }
}

impl From<&SyncSettings> for SyncTimings {
    fn from(settings: &SyncSettings) -> Self {
        SyncTimings {
            status_poll_interval: Duration::from_secs(settings.status_poll_interval_secs),
            bootstrap_warning: Duration::from_secs(settings.bootstrap_warning_secs),
            fallback_message: Duration::from_secs(settings.fallback_message_secs),
        }
    }
}

// =============================================================================
// Cache Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Database file. Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    4
}

impl Default for CacheSettings {
    fn default() -> Self {
        CacheSettings {
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

// =============================================================================
// Main Sync Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub device: DeviceConfig,

    #[serde(default)]
    pub sync: SyncSettings,

    #[serde(default)]
    pub cache: CacheSettings,
}

impl SyncConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration: defaults, then the file, then environment.
    pub fn load(config_path: Option<PathBuf>) -> SyncResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> SyncResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SyncError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    pub fn validate(&self) -> SyncResult<()> {
        if self.device.id.trim().is_empty() {
            return Err(SyncError::MissingDeviceId);
        }

        // A zero interval would make tokio::time::interval panic.
        if self.sync.status_poll_interval_secs == 0 {
            return Err(SyncError::InvalidConfig(
                "status_poll_interval_secs must be greater than 0".into(),
            ));
        }

        if self.cache.max_connections == 0 {
            return Err(SyncError::InvalidConfig(
                "cache.max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies `MOODMAP_*` overrides read through `lookup`.
    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(id) = lookup("MOODMAP_DEVICE_ID") {
            debug!(device_id = %id, "Overriding device ID from environment");
            self.device.id = id;
        }

        if let Some(name) = lookup("MOODMAP_DEVICE_NAME") {
            self.device.name = name;
        }

        if let Some(mode) = lookup("MOODMAP_SYNC_MODE") {
            match mode.parse() {
                Ok(parsed) => {
                    debug!(mode = %mode, "Overriding sync mode from environment");
                    self.sync.mode = parsed;
                }
                Err(_) => warn!(mode = %mode, "Unknown sync mode in environment"),
            }
        }

        if let Some(secs) = lookup("MOODMAP_POLL_INTERVAL_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.sync.status_poll_interval_secs = s,
                Err(_) => warn!(value = %secs, "Invalid poll interval in environment"),
            }
        }

        if let Some(path) = lookup("MOODMAP_CACHE_PATH") {
            debug!(path = %path, "Overriding cache path from environment");
            self.cache.path = Some(PathBuf::from(path));
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("app", "moodmap", "moodmap")
    }

    /// Platform config file location.
    pub fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Cache file to open: the configured path, else the platform data dir,
    /// else the working directory.
    pub fn cache_path(&self) -> PathBuf {
        self.cache
            .path
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().join(CACHE_FILE_NAME)))
            .unwrap_or_else(|| PathBuf::from(CACHE_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn device_id(&self) -> &str {
        &self.device.id
    }

    pub fn mode(&self) -> SyncMode {
        self.sync.mode
    }

    pub fn timings(&self) -> SyncTimings {
        SyncTimings::from(&self.sync)
    }
}
