use quire_types::ResultRecord;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tokio::time::Instant;
use tracing::debug;

/// Request-coalescing cache of resolved result lists, keyed by normalized
/// query text.
///
/// Each key owns a slot guarded by an async mutex: a second request for a key
/// whose resolution is in flight waits on the slot instead of recomputing, so
/// at most one resolution runs per distinct query string. Entries expire
/// after a fixed TTL and the whole cache is dropped on any mutating action.
/// Cached values are result lists only, never navigation state.
pub(crate) struct QueryCache {
    ttl: Duration,
    slots: Mutex<HashMap<String, Arc<AsyncMutex<Slot>>>>,
}

#[derive(Default)]
struct Slot {
    value: Option<(Vec<ResultRecord>, Instant)>,
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached value for `key`, or run `compute` and cache its
    /// result. Concurrent calls for the same key compute once.
    pub async fn get_or_compute(
        &self,
        key: &str,
        compute: impl FnOnce() -> Vec<ResultRecord>,
    ) -> Vec<ResultRecord> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(key.to_string()).or_default())
        };

        let mut guard = slot.lock().await;
        if let Some((value, stored_at)) = &guard.value
            && stored_at.elapsed() < self.ttl
        {
            debug!("cache hit for query '{key}'");
            return value.clone();
        }

        let value = compute();
        guard.value = Some((value.clone(), Instant::now()));
        value
    }

    /// Drop every entry. Called after create/sync actions so stale results
    /// never shadow fresh store state.
    pub fn clear(&self) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        debug!("query cache cleared");
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
