//! TTL-based cache with lazy expiry.
//!
//! Entries are checked against the current TTL on every read and evicted by
//! the read that finds them stale. There is no background sweep, so memory is
//! bounded by read traffic.

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::infrastructure::ports::ClockPort;

/// A concurrent cache with time-to-live expiration.
///
/// Every public operation touches a single key, relying on the map's
/// per-key locking; callers never hold a lock across calls. The TTL can be
/// changed at runtime and applies to existing entries on their next read.
/// A TTL of zero disables caching: every read misses.
pub struct TtlCache<K, V> {
    entries: DashMap<K, TtlEntry<V>>,
    ttl_millis: AtomicU64,
    clock: Arc<dyn ClockPort>,
}

struct TtlEntry<V> {
    value: V,
    inserted_at: DateTime<Utc>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a new cache with the specified TTL.
    pub fn new(ttl: Duration, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl_millis: AtomicU64::new(duration_millis(ttl)),
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_millis.load(Ordering::Relaxed))
    }

    /// Change the TTL used by future validity checks.
    pub fn set_ttl(&self, ttl: Duration) {
        self.ttl_millis.store(duration_millis(ttl), Ordering::Relaxed);
    }

    /// Insert a value, replacing any existing entry and resetting its timestamp.
    pub fn insert(&self, key: K, value: V) {
        let inserted_at = self.clock.now();
        self.entries.insert(key, TtlEntry { value, inserted_at });
    }

    /// Insert a value with an explicit timestamp (tests only).
    #[cfg(test)]
    pub fn insert_at(&self, key: K, value: V, inserted_at: DateTime<Utc>) {
        self.entries.insert(key, TtlEntry { value, inserted_at });
    }

    /// Get a value if it exists and hasn't expired, evicting it if it has.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let ttl = self.ttl_millis.load(Ordering::Relaxed);

        {
            // The shard guard must be dropped before remove_if below.
            let entry = self.entries.get(key)?;
            if is_fresh(entry.inserted_at, now, ttl) {
                return Some(entry.value.clone());
            }
        }

        // Re-checked under the write lock so a concurrent replacement survives.
        self.entries
            .remove_if(key, |_, entry| !is_fresh(entry.inserted_at, now, ttl));
        None
    }

    /// Remove and return a value if it exists (regardless of expiration).
    pub fn remove(&self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|(_, entry)| entry.value)
    }

    /// Remove every entry and return how many were present.
    pub fn clear(&self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    /// Get the current number of entries (including expired ones not yet read).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_fresh(inserted_at: DateTime<Utc>, now: DateTime<Utc>, ttl_millis: u64) -> bool {
    if ttl_millis == 0 {
        return false;
    }
    let age = now.signed_duration_since(inserted_at).num_milliseconds();
    age <= i64::try_from(ttl_millis).unwrap_or(i64::MAX)
}

fn duration_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)
}
