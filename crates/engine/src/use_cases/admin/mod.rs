//! Administrative cache operations.

use std::sync::Arc;
use std::time::Duration;

use crate::stores::PlayerDataCache;

/// Point-in-time cache figures for the stats endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub duration: Duration,
}

pub struct ManageCache {
    cache: Arc<PlayerDataCache>,
}

impl ManageCache {
    pub fn new(cache: Arc<PlayerDataCache>) -> Self {
        Self { cache }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.cache.size(),
            duration: self.cache.duration(),
        }
    }

    /// Drop every cached profile. Returns how many were removed.
    pub fn clear(&self) -> usize {
        self.cache.clear()
    }

    pub fn invalidate(&self, name: &str) -> bool {
        self.cache.invalidate(name)
    }

    pub fn set_duration(&self, duration: Duration) -> Duration {
        self.cache.set_duration(duration);
        self.cache.duration()
    }
}
