//! Collaborators every runtime operation needs, bundled so bootstrap,
//! pipeline, tracker and resync share one handle.

use std::sync::Arc;

use crate::cache::{self, MoodCache};
use crate::config::SyncTimings;
use crate::gateway::RemoteGateway;
use crate::store::Store;

#[derive(Clone)]
pub struct SyncContext {
    pub store: Store,
    pub gateway: Arc<dyn RemoteGateway>,
    pub cache: Arc<dyn MoodCache>,
    pub timings: SyncTimings,
}

impl SyncContext {
    pub fn new(
        store: Store,
        gateway: Arc<dyn RemoteGateway>,
        cache: Arc<dyn MoodCache>,
        timings: SyncTimings,
    ) -> Self {
        SyncContext {
            store,
            gateway,
            cache,
            timings,
        }
    }

    /// Mirrors current moods and settings into the cache. Skipped once the
    /// store is closed.
    pub async fn persist(&self) {
        if self.store.is_closed() {
            return;
        }
        let state = self.store.snapshot();
        cache::write_through(self.cache.as_ref(), &state).await;
    }
}

impl std::fmt::Debug for SyncContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncContext")
            .field("store", &self.store)
            .field("gateway", &self.gateway.name())
            .field("timings", &self.timings)
            .finish_non_exhaustive()
    }
}
