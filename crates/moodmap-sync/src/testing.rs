//! Scriptable collaborators for unit tests.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use moodmap_core::{Intensity, MoodDraft, MoodEntry, MoodName, SettingsPatch, UserSettings};

use crate::cache::MoodCache;
use crate::config::SyncTimings;
use crate::context::SyncContext;
use crate::error::{SyncError, SyncResult};
use crate::gateway::{GatewayResponse, RemoteGateway};
use crate::store::Store;

/// A server-style entry `minutes` after a fixed epoch.
pub fn entry_at(name: MoodName, minutes: i64) -> MoodEntry {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
    let draft = MoodDraft::new(name, Intensity::new(3).unwrap());
    let mut entry = MoodEntry::local_from_draft_at(&draft, base + ChronoDuration::minutes(minutes));
    entry.id = format!("srv-{}-{}", name, minutes);
    entry
}

/// Context over a fresh store with default timings.
pub fn harness(gateway: MockGateway, cache: MemoryCache) -> SyncContext {
    SyncContext::new(
        Store::new(),
        Arc::new(gateway),
        Arc::new(cache),
        SyncTimings::default(),
    )
}

// =============================================================================
// Mock Gateway
// =============================================================================

#[derive(Debug, Clone)]
enum WriteBehavior<T> {
    /// Accept and answer with a server-normalized echo.
    Echo,
    Fail,
    Respond(GatewayResponse<T>),
}

#[derive(Debug)]
struct MockState {
    moods: GatewayResponse<Vec<MoodEntry>>,
    settings: GatewayResponse<SettingsPatch>,
    create: WriteBehavior<MoodEntry>,
    update: WriteBehavior<SettingsPatch>,
    offline: bool,
    pending: u32,
    delay: Option<Duration>,
    /// Per-call delays for `create_mood`, consumed in call order.
    create_delays: VecDeque<Duration>,
    next_id: u32,
    calls: Vec<&'static str>,
}

/// In-memory gateway. Clones share state, so a test can keep one clone and
/// change behavior after handing the other to a context.
#[derive(Debug, Clone)]
pub struct MockGateway {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGateway {
    /// Online, empty remote, writes echoed back.
    pub fn new() -> Self {
        MockGateway {
            state: Arc::new(Mutex::new(MockState {
                moods: GatewayResponse::ok(Vec::new()),
                settings: GatewayResponse::ok(SettingsPatch::default()),
                create: WriteBehavior::Echo,
                update: WriteBehavior::Echo,
                offline: false,
                pending: 0,
                delay: None,
                create_delays: VecDeque::new(),
                next_id: 1,
                calls: Vec::new(),
            })),
        }
    }

    fn edit(self, f: impl FnOnce(&mut MockState)) -> Self {
        f(&mut self.state.lock().unwrap());
        self
    }

    pub fn with_moods(self, moods: Vec<MoodEntry>) -> Self {
        self.edit(|s| s.moods = GatewayResponse::ok(moods))
    }

    pub fn with_settings(self, patch: SettingsPatch) -> Self {
        self.edit(|s| s.settings = GatewayResponse::ok(patch))
    }

    pub fn failing_reads(self) -> Self {
        self.set_failing_reads(true);
        self
    }

    pub fn failing_writes(self) -> Self {
        self.edit(|s| {
            s.create = WriteBehavior::Fail;
            s.update = WriteBehavior::Fail;
        })
    }

    pub fn with_created(self, entry: MoodEntry) -> Self {
        self.edit(|s| s.create = WriteBehavior::Respond(GatewayResponse::ok(entry)))
    }

    pub fn with_create_response(self, response: GatewayResponse<MoodEntry>) -> Self {
        self.edit(|s| s.create = WriteBehavior::Respond(response))
    }

    pub fn with_canonical_settings(self, patch: SettingsPatch) -> Self {
        self.edit(|s| s.update = WriteBehavior::Respond(GatewayResponse::ok(patch)))
    }

    pub fn with_status(self, offline: bool, pending: u32) -> Self {
        self.set_status(offline, pending);
        self
    }

    /// Every call sleeps this long before answering.
    pub fn with_delay(self, delay: Duration) -> Self {
        self.edit(|s| s.delay = Some(delay))
    }

    /// The n-th `create_mood` call sleeps `delays[n]`; later calls fall
    /// back to the shared delay.
    pub fn with_create_delays(self, delays: Vec<Duration>) -> Self {
        self.edit(|s| s.create_delays = delays.into())
    }

    pub fn set_delay(&self, delay: Duration) {
        self.state.lock().unwrap().delay = Some(delay);
    }

    pub fn set_status(&self, offline: bool, pending: u32) {
        let mut s = self.state.lock().unwrap();
        s.offline = offline;
        s.pending = pending;
    }

    pub fn set_moods(&self, moods: Vec<MoodEntry>) {
        self.state.lock().unwrap().moods = GatewayResponse::ok(moods);
    }

    pub fn set_failing_reads(&self, failing: bool) {
        let mut s = self.state.lock().unwrap();
        if failing {
            s.moods = GatewayResponse::failed();
            s.settings = GatewayResponse::failed();
        } else {
            s.moods = GatewayResponse::ok(Vec::new());
            s.settings = GatewayResponse::ok(SettingsPatch::default());
        }
    }

    /// Only `get_settings` fails; moods stay as configured.
    pub fn set_failing_settings(&self) {
        self.state.lock().unwrap().settings = GatewayResponse::failed();
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| **c == name).count()
    }

    async fn enter(&self, call: &'static str) {
        let delay = {
            let mut s = self.state.lock().unwrap();
            s.calls.push(call);
            match call {
                "create_mood" => s.create_delays.pop_front().or(s.delay),
                _ => s.delay,
            }
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl RemoteGateway for MockGateway {
    async fn get_moods(&self) -> GatewayResponse<Vec<MoodEntry>> {
        self.enter("get_moods").await;
        self.state.lock().unwrap().moods.clone()
    }

    async fn get_settings(&self) -> GatewayResponse<SettingsPatch> {
        self.enter("get_settings").await;
        self.state.lock().unwrap().settings.clone()
    }

    async fn create_mood(&self, draft: &MoodDraft) -> GatewayResponse<MoodEntry> {
        self.enter("create_mood").await;
        let mut s = self.state.lock().unwrap();
        match s.create.clone() {
            WriteBehavior::Echo => {
                let mut entry = MoodEntry::local_from_draft(draft);
                entry.id = format!("srv-{}", s.next_id);
                s.next_id += 1;
                GatewayResponse::ok(entry)
            }
            WriteBehavior::Fail => GatewayResponse::failed(),
            WriteBehavior::Respond(response) => response,
        }
    }

    async fn update_settings(&self, patch: &SettingsPatch) -> GatewayResponse<SettingsPatch> {
        self.enter("update_settings").await;
        match self.state.lock().unwrap().update.clone() {
            WriteBehavior::Echo => GatewayResponse::ok(patch.clone()),
            WriteBehavior::Fail => GatewayResponse::failed(),
            WriteBehavior::Respond(response) => response,
        }
    }

    async fn sync_data(&self) {
        self.enter("sync_data").await;
    }

    async fn is_offline(&self) -> bool {
        self.enter("is_offline").await;
        self.state.lock().unwrap().offline
    }

    async fn pending_sync_count(&self) -> u32 {
        self.enter("pending_sync_count").await;
        self.state.lock().unwrap().pending
    }

    async fn queue_mood(&self, _entry: &MoodEntry) {
        self.state.lock().unwrap().calls.push("queue_mood");
    }

    async fn queue_settings(&self, _patch: &SettingsPatch) {
        self.state.lock().unwrap().calls.push("queue_settings");
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// =============================================================================
// Memory Cache
// =============================================================================

#[derive(Debug, Default)]
struct CacheSlots {
    moods: Option<String>,
    settings: Option<String>,
}

/// Cache that keeps serialized JSON, so reads exercise the same
/// string-to-date rehydration as the SQLite cache.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    slots: Arc<Mutex<CacheSlots>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_moods(self, moods: &[MoodEntry]) -> Self {
        let raw = serde_json::to_string(moods).unwrap();
        self.with_raw_moods(&raw)
    }

    pub fn with_raw_moods(self, raw: &str) -> Self {
        self.slots.lock().unwrap().moods = Some(raw.to_string());
        self
    }

    pub fn with_settings(self, settings: &UserSettings) -> Self {
        self.slots.lock().unwrap().settings = Some(serde_json::to_string(settings).unwrap());
        self
    }

    pub fn with_raw_settings(self, raw: &str) -> Self {
        self.slots.lock().unwrap().settings = Some(raw.to_string());
        self
    }

    pub fn stored_moods(&self) -> Option<Vec<MoodEntry>> {
        let raw = self.slots.lock().unwrap().moods.clone()?;
        Some(serde_json::from_str(&raw).unwrap())
    }

    pub fn stored_settings(&self) -> Option<UserSettings> {
        let raw = self.slots.lock().unwrap().settings.clone()?;
        Some(serde_json::from_str(&raw).unwrap())
    }
}

fn decode<T: serde::de::DeserializeOwned>(raw: Option<String>) -> SyncResult<Option<T>> {
    raw.map(|r| serde_json::from_str(&r).map_err(|e| SyncError::MalformedCache(e.to_string())))
        .transpose()
}

#[async_trait]
impl MoodCache for MemoryCache {
    async fn load_moods(&self) -> SyncResult<Option<Vec<MoodEntry>>> {
        decode(self.slots.lock().unwrap().moods.clone())
    }

    async fn load_settings(&self) -> SyncResult<Option<SettingsPatch>> {
        decode(self.slots.lock().unwrap().settings.clone())
    }

    async fn save_moods(&self, moods: &[MoodEntry]) -> SyncResult<()> {
        self.slots.lock().unwrap().moods = Some(serde_json::to_string(moods)?);
        Ok(())
    }

    async fn save_settings(&self, settings: &UserSettings) -> SyncResult<()> {
        self.slots.lock().unwrap().settings = Some(serde_json::to_string(settings)?);
        Ok(())
    }
}
