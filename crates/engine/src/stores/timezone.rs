//! Per-player timezone preferences.
//!
//! Held in memory and written through to a [`TimeZoneRepo`] on every change.
//! Persistence failures are logged and leave the in-memory value in place.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use playerinfo_domain::PlayerId;
use tokio::sync::Mutex;

use crate::infrastructure::ports::{RepoError, TimeZoneRepo};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TimeZoneError {
    #[error("Timezone label must not be empty")]
    EmptyLabel,
}

pub struct TimeZoneStore {
    zones: DashMap<PlayerId, String>,
    default_zone: String,
    repo: Arc<dyn TimeZoneRepo>,
    initialized: AtomicBool,
    shut_down: AtomicBool,
    /// Serializes flushes so a later snapshot never lands before an earlier one.
    save_lock: Mutex<()>,
    log_events: bool,
}

impl TimeZoneStore {
    pub fn new(repo: Arc<dyn TimeZoneRepo>, default_zone: impl Into<String>, log_events: bool) -> Self {
        Self {
            zones: DashMap::new(),
            default_zone: default_zone.into(),
            repo,
            initialized: AtomicBool::new(false),
            shut_down: AtomicBool::new(false),
            save_lock: Mutex::new(()),
            log_events,
        }
    }

    /// Hydrate from the repository. Only the first call does anything.
    ///
    /// Returns the number of entries loaded. Malformed ids and empty labels
    /// are skipped with a warning; a repository failure leaves the store empty.
    pub async fn load(&self) -> usize {
        if self
            .initialized
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return 0;
        }

        let stored = match self.repo.load_all().await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load timezone data");
                return 0;
            }
        };

        let mut loaded = 0;
        for (raw_id, zone) in stored {
            let Ok(player_id) = PlayerId::from_str(&raw_id) else {
                tracing::warn!(id = %raw_id, "Skipping timezone entry with malformed player id");
                continue;
            };
            if zone.trim().is_empty() {
                tracing::warn!(player_id = %player_id, "Skipping empty timezone entry");
                continue;
            }
            self.zones.insert(player_id, zone);
            loaded += 1;
        }

        tracing::info!(count = loaded, "Loaded player timezones");
        loaded
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Stored timezone for the player, or the configured default.
    pub fn get(&self, player_id: PlayerId) -> String {
        self.zones
            .get(&player_id)
            .map(|zone| zone.value().clone())
            .unwrap_or_else(|| self.default_zone.clone())
    }

    pub fn default_zone(&self) -> &str {
        &self.default_zone
    }

    /// Store a timezone and flush the whole mapping before returning.
    pub async fn set(&self, player_id: PlayerId, zone: &str) -> Result<(), TimeZoneError> {
        let zone = zone.trim();
        if zone.is_empty() {
            return Err(TimeZoneError::EmptyLabel);
        }

        self.zones.insert(player_id, zone.to_string());
        if self.log_events {
            tracing::info!(player_id = %player_id, timezone = %zone, "Player timezone set");
        }

        if let Err(e) = self.save().await {
            tracing::error!(
                player_id = %player_id,
                error = %e,
                "Failed to persist timezone change, keeping in-memory value"
            );
        }
        Ok(())
    }

    /// Write the full mapping to the repository.
    pub async fn save(&self) -> Result<(), RepoError> {
        let _guard = self.save_lock.lock().await;
        let snapshot: BTreeMap<String, String> = self
            .zones
            .iter()
            .map(|entry| (entry.key().to_string(), entry.value().clone()))
            .collect();
        self.repo.save_all(&snapshot).await
    }

    /// Final flush at shutdown.
    pub async fn shutdown(&self) {
        match self.save().await {
            Ok(()) => tracing::info!(count = self.zones.len(), "Saved player timezones"),
            Err(e) => tracing::error!(error = %e, "Failed to save timezone data on shutdown"),
        }
        self.shut_down.store(true, Ordering::Release);
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
