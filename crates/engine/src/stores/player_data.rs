//! Profile snapshot cache.
//!
//! Keys are case-folded player names. Snapshots are shared as `Arc` so a hit
//! hands out the exact value that was stored.

use std::sync::Arc;
use std::time::Duration;

use playerinfo_domain::{fold_name, ProfileSnapshot};

use crate::infrastructure::cache::TtlCache;
use crate::infrastructure::ports::ClockPort;

/// Time-bounded cache of assembled profiles.
pub struct PlayerDataCache {
    inner: TtlCache<String, Arc<ProfileSnapshot>>,
    debug: bool,
}

impl PlayerDataCache {
    pub fn new(duration: Duration, clock: Arc<dyn ClockPort>, debug: bool) -> Self {
        Self {
            inner: TtlCache::new(duration, clock),
            debug,
        }
    }

    /// Get a snapshot if present and still within the cache duration.
    pub fn get(&self, name: &str) -> Option<Arc<ProfileSnapshot>> {
        let key = fold_name(name);
        let hit = self.inner.get(&key);
        if self.debug {
            tracing::info!(player = %key, hit = hit.is_some(), "Profile cache lookup");
        }
        hit
    }

    /// Store a snapshot, replacing any previous entry. Empty names are ignored.
    pub fn put(&self, name: &str, snapshot: Arc<ProfileSnapshot>) {
        if name.is_empty() {
            return;
        }
        let key = fold_name(name);
        if self.debug {
            tracing::info!(player = %key, "Caching profile");
        }
        self.inner.insert(key, snapshot);
    }

    /// Drop the entry for `name`. Returns whether one was present.
    pub fn invalidate(&self, name: &str) -> bool {
        let key = fold_name(name);
        let removed = self.inner.remove(&key).is_some();
        if self.debug {
            tracing::info!(player = %key, removed, "Invalidated profile cache entry");
        }
        removed
    }

    pub fn clear(&self) -> usize {
        let cleared = self.inner.clear();
        tracing::info!(cleared, "Profile cache cleared");
        cleared
    }

    pub fn size(&self) -> usize {
        self.inner.len()
    }

    pub fn duration(&self) -> Duration {
        self.inner.ttl()
    }

    /// Change the validity threshold. Existing entries keep their timestamps.
    pub fn set_duration(&self, duration: Duration) {
        self.inner.set_ttl(duration);
        tracing::info!(seconds = duration.as_secs(), "Profile cache duration updated");
    }
}
