//! # Bootstrap Loader
//!
//! Fills the store once at startup.
//!
//! ## Precedence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bootstrap Precedence                             │
//! │                                                                         │
//! │  SetLoading(true)                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  join!(get_moods, get_settings)          both in flight together       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  moods:    remote non-empty ──► remote                                 │
//! │            else cache non-empty ──► cache                              │
//! │            else ──► []                                                 │
//! │  settings: remote ok ──► defaults ⊕ remote fragment                    │
//! │            else ──► defaults ⊕ cached fragment                         │
//! │       │                                                                 │
//! │       ├── cache read failed ──► cache-only path, each collection       │
//! │       │                         defaulting on its own; any failure     │
//! │       │                         flashes "Failed to load data"          │
//! │       ▼                                                                 │
//! │  ReplaceAllData, flash "Working offline" if a remote call failed       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SetLoading(false), write-through                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The result is always a usable state; the worst case is an empty log and
//! built-in default settings.

use tracing::{info, warn};

use moodmap_core::{
    Action, MoodEntry, SettingsPatch, UserSettings, MSG_LOAD_FAILED, MSG_WORKING_OFFLINE,
};

use crate::context::SyncContext;
use crate::error::SyncResult;

/// Where the initial mood collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodSource {
    Remote,
    Cache,
    Empty,
}

/// Summary of a bootstrap run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub mood_source: MoodSource,
    pub mood_count: usize,
    /// Both remote calls reported success.
    pub remote_ok: bool,
    /// The cache-only path ran because the primary path hit a cache error.
    pub used_fallback: bool,
    /// Message flashed to the user, if any.
    pub warning: Option<&'static str>,
}

struct Loaded {
    moods: Vec<MoodEntry>,
    settings: UserSettings,
    source: MoodSource,
    /// A cached collection was unreadable and replaced by its default.
    cache_failed: bool,
}

/// Runs the startup load against `ctx` and fills its store.
pub async fn bootstrap(ctx: &SyncContext) -> BootstrapReport {
    info!(gateway = ctx.gateway.name(), "Bootstrapping state");
    ctx.store.dispatch(Action::SetLoading(true));

    let (moods_res, settings_res) =
        tokio::join!(ctx.gateway.get_moods(), ctx.gateway.get_settings());
    let remote_ok = moods_res.success && settings_res.success;

    let remote_moods = moods_res.into_success_data().unwrap_or_default();
    let remote_settings = if settings_res.success {
        Some(settings_res.data.unwrap_or_default())
    } else {
        None
    };

    let (loaded, used_fallback) = match assemble(ctx, remote_moods, remote_settings).await {
        Ok(loaded) => (loaded, false),
        Err(e) => {
            warn!(
                ?e,
                malformed = e.is_malformed_cache(),
                "Bootstrap hit a cache error, falling back to cache only"
            );
            (load_cache_only(ctx).await, true)
        }
    };

    let report = BootstrapReport {
        mood_source: loaded.source,
        mood_count: loaded.moods.len(),
        remote_ok,
        used_fallback,
        warning: if loaded.cache_failed {
            Some(MSG_LOAD_FAILED)
        } else if !remote_ok {
            Some(MSG_WORKING_OFFLINE)
        } else {
            None
        },
    };

    ctx.store.dispatch(Action::ReplaceAllData {
        moods: loaded.moods,
        settings: loaded.settings,
    });
    if let Some(message) = report.warning {
        ctx.store.flash(message, ctx.timings.bootstrap_warning);
    }
    ctx.store.dispatch(Action::SetLoading(false));
    ctx.persist().await;

    info!(
        source = ?report.mood_source,
        moods = report.mood_count,
        remote_ok = report.remote_ok,
        "Bootstrap complete"
    );
    report
}

/// Primary path. A cache error aborts it unless the remote already
/// supplied the moods, which are never discarded for a cache problem.
async fn assemble(
    ctx: &SyncContext,
    remote_moods: Vec<MoodEntry>,
    remote_settings: Option<SettingsPatch>,
) -> SyncResult<Loaded> {
    let (moods, source) = if !remote_moods.is_empty() {
        (remote_moods, MoodSource::Remote)
    } else {
        match ctx.cache.load_moods().await? {
            Some(cached) if !cached.is_empty() => (cached, MoodSource::Cache),
            _ => (Vec::new(), MoodSource::Empty),
        }
    };

    let mut cache_failed = false;
    let fragment = match remote_settings {
        Some(fragment) => fragment,
        None if source == MoodSource::Remote => match ctx.cache.load_settings().await {
            Ok(cached) => cached.unwrap_or_default(),
            Err(e) => {
                warn!(?e, "Cached settings unreadable, keeping remote moods");
                cache_failed = true;
                SettingsPatch::default()
            }
        },
        None => ctx.cache.load_settings().await?.unwrap_or_default(),
    };

    Ok(Loaded {
        moods,
        settings: UserSettings::from_patch(fragment),
        source,
        cache_failed,
    })
}

/// Cache-only path. Each collection defaults on its own.
async fn load_cache_only(ctx: &SyncContext) -> Loaded {
    let mut failed = false;

    let (moods, source) = match ctx.cache.load_moods().await {
        Ok(Some(cached)) if !cached.is_empty() => (cached, MoodSource::Cache),
        Ok(_) => (Vec::new(), MoodSource::Empty),
        Err(e) => {
            warn!(?e, "Cached moods unreadable, starting empty");
            failed = true;
            (Vec::new(), MoodSource::Empty)
        }
    };

    let fragment = match ctx.cache.load_settings().await {
        Ok(fragment) => fragment.unwrap_or_default(),
        Err(e) => {
            warn!(?e, "Cached settings unreadable, using defaults");
            failed = true;
            SettingsPatch::default()
        }
    };

    Loaded {
        moods,
        settings: UserSettings::from_patch(fragment),
        source,
        cache_failed: failed,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
