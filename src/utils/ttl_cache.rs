use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use chrono::Duration;
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::models::cache::CacheEntry;

/// In-memory string cache where every entry carries its own deadline.
///
/// Expiry is checked on every `get`, so an entry past its deadline reads as absent whether or
/// not the optional background sweep has removed it yet.
pub struct TtlCache {
    entries: Arc<DashMap<String, CacheEntry<String>>>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl TtlCache {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            sweeper: Mutex::new(None),
        }
    }

    /// Same as `new`, plus a task evicting expired entries every `interval`.
    /// Must be called from inside a tokio runtime.
    pub fn with_sweep(interval: StdDuration) -> Self {
        let cache = Self::new();
        let entries = cache.entries.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let before = entries.len();
                entries.retain(|_, entry| !entry.is_expired());
                trace!("cache sweep evicted {} entries", before.saturating_sub(entries.len()));
            }
        });
        if let Ok(mut sweeper) = cache.sweeper.lock() {
            *sweeper = Some(handle);
        }
        cache
    }

    /// Stores `value` under `key`, replacing any previous entry. A `ttl` of zero or less
    /// invalidates the key.
    pub fn set(&self, key: &str, value: String, ttl: Duration) {
        self.entries
            .insert(key.to_string(), CacheEntry::new(value, ttl));
    }

    /// Returns the last value stored under `key` unless it has expired. Empty values are
    /// returned as stored.
    pub fn get(&self, key: &str) -> Option<String> {
        let entry = self.entries.get(key)?;
        if entry.is_expired() {
            return None;
        }
        Some(entry.value.clone())
    }

    /// Stops the background sweep, if any. Safe to call more than once.
    pub fn close(&self) {
        let handle = match self.sweeper.lock() {
            Ok(mut sweeper) => sweeper.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            handle.abort();
            debug!("cache sweep stopped");
        }
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TtlCache {
    fn drop(&mut self) {
        self.close();
    }
}
