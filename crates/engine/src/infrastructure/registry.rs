//! In-memory player registry fed by host game hooks.
//!
//! The standalone server has no game attached, so the host (or a test)
//! drives this registry through `record_join`, `record_quit` and
//! `update_position`. Join and quit notify the attached
//! [`PlayerEventListener`] before returning, and also publish the
//! [`PlayerEvent`] on the optional channel.
//!
//! A player on their first session has not "played before": `first_seen`
//! stays unset until the first quit, then takes the first join time.

use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};

use async_trait::async_trait;
use dashmap::DashMap;
use playerinfo_domain::{fold_name, OnlineSnapshot, PlayerEvent, PlayerId, PlayerIdentity};
use tokio::sync::mpsc;

use crate::infrastructure::ports::{
    ClockPort, PlayerEventListener, PlayerRegistryPort, RegistryError,
};

#[derive(Debug, Clone)]
struct PlayerRecord {
    identity: PlayerIdentity,
    online: bool,
    position: Option<OnlineSnapshot>,
    /// Join time of a first session, moved to `first_seen` on quit.
    first_session_start: Option<DateTime<Utc>>,
}

pub struct InMemoryPlayerRegistry {
    players: DashMap<PlayerId, PlayerRecord>,
    /// Folded name -> id
    names: DashMap<String, PlayerId>,
    max_players: u32,
    server_version: String,
    clock: Arc<dyn ClockPort>,
    listener: OnceLock<Arc<dyn PlayerEventListener>>,
    events: Option<mpsc::UnboundedSender<PlayerEvent>>,
}

impl InMemoryPlayerRegistry {
    pub fn new(max_players: u32, server_version: impl Into<String>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            players: DashMap::new(),
            names: DashMap::new(),
            max_players,
            server_version: server_version.into(),
            clock,
            listener: OnceLock::new(),
            events: None,
        }
    }

    /// Publish join/quit events on `events`.
    pub fn with_events(mut self, events: mpsc::UnboundedSender<PlayerEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Notify `listener` of every join and quit. Only the first call takes
    /// effect; returns false if a listener was already attached.
    pub fn attach_listener(&self, listener: Arc<dyn PlayerEventListener>) -> bool {
        self.listener.set(listener).is_ok()
    }

    /// Seed an offline player record.
    pub fn insert_known(&self, identity: PlayerIdentity) {
        self.index_name(identity.id, &identity.name);
        self.players.insert(
            identity.id,
            PlayerRecord {
                identity,
                online: false,
                position: None,
                first_session_start: None,
            },
        );
    }

    /// Mark a player online, creating the record on first join.
    pub fn record_join(&self, id: PlayerId, name: &str, display_name: &str) {
        let now = self.clock.now();
        self.index_name(id, name);

        let mut record = self.players.entry(id).or_insert_with(|| PlayerRecord {
            identity: PlayerIdentity::new(id, name),
            online: false,
            position: None,
            first_session_start: None,
        });
        if record.identity.first_seen.is_none() && record.first_session_start.is_none() {
            record.first_session_start = Some(now);
        }
        let identity = &mut record.identity;
        identity.name = name.to_string();
        identity.display_name = display_name.to_string();
        identity.last_seen = Some(now);
        record.online = true;
        drop(record);

        self.publish(PlayerEvent::Joined {
            player_id: id,
            name: name.to_string(),
        });
    }

    /// Mark a player offline. Returns false for unknown ids.
    pub fn record_quit(&self, id: PlayerId) -> bool {
        let now = self.clock.now();
        let name = {
            let Some(mut record) = self.players.get_mut(&id) else {
                return false;
            };
            record.online = false;
            record.position = None;
            record.identity.last_seen = Some(now);
            if let Some(start) = record.first_session_start.take() {
                record.identity.first_seen = Some(start);
            }
            record.identity.display_name = record.identity.name.clone();
            record.identity.name.clone()
        };

        self.publish(PlayerEvent::Quit {
            player_id: id,
            name,
        });
        true
    }

    /// Update the live position of an online player. Returns false otherwise.
    pub fn update_position(&self, id: PlayerId, world: &str, x: f64, y: f64, z: f64) -> bool {
        match self.players.get_mut(&id) {
            Some(mut record) if record.online => {
                record.position = Some(OnlineSnapshot::new(world, x, y, z));
                true
            }
            _ => false,
        }
    }

    pub fn online_count(&self) -> usize {
        self.players.iter().filter(|r| r.online).count()
    }

    fn index_name(&self, id: PlayerId, name: &str) {
        if let Some(previous) = self.players.get(&id).map(|r| fold_name(&r.identity.name)) {
            if previous != fold_name(name) {
                self.names.remove_if(&previous, |_, owner| *owner == id);
            }
        }
        self.names.insert(fold_name(name), id);
    }

    fn record_by_name(&self, name: &str) -> Option<PlayerRecord> {
        let id = *self.names.get(&fold_name(name))?;
        self.players.get(&id).map(|r| r.value().clone())
    }

    fn publish(&self, event: PlayerEvent) {
        if let Some(listener) = self.listener.get() {
            listener.on_player_event(&event);
        }
        let Some(events) = &self.events else {
            return;
        };
        if events.send(event).is_err() {
            tracing::warn!("Player event channel closed");
        }
    }
}

#[async_trait]
impl PlayerRegistryPort for InMemoryPlayerRegistry {
    async fn is_known(&self, name: &str) -> Result<bool, RegistryError> {
        Ok(self
            .record_by_name(name)
            .is_some_and(|r| r.identity.has_played_before()))
    }

    async fn is_online(&self, name: &str) -> Result<bool, RegistryError> {
        Ok(self.record_by_name(name).is_some_and(|r| r.online))
    }

    async fn identity(&self, name: &str) -> Result<Option<PlayerIdentity>, RegistryError> {
        Ok(self.record_by_name(name).map(|r| r.identity))
    }

    async fn online_snapshot(&self, id: PlayerId) -> Result<Option<OnlineSnapshot>, RegistryError> {
        Ok(self
            .players
            .get(&id)
            .filter(|r| r.online)
            .and_then(|r| r.position.clone()))
    }

    async fn online_players(&self) -> Result<Vec<(PlayerId, String)>, RegistryError> {
        let mut online: Vec<(PlayerId, String)> = self
            .players
            .iter()
            .filter(|r| r.online)
            .map(|r| (r.identity.id, r.identity.name.clone()))
            .collect();
        online.sort_by(|a, b| a.1.cmp(&b.1));
        Ok(online)
    }

    fn max_players(&self) -> u32 {
        self.max_players
    }

    fn server_version(&self) -> String {
        self.server_version.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{FixedClock, ManualClock};
    use chrono::{TimeZone, Utc};

    fn registry() -> InMemoryPlayerRegistry {
        let now = Utc.with_ymd_and_hms(2025, 5, 5, 10, 0, 0).unwrap();
        InMemoryPlayerRegistry::new(20, "test-server 1.0", Arc::new(FixedClock(now)))
    }

    #[tokio::test]
    async fn unknown_names_are_not_found() {
        let registry = registry();
        assert!(!registry.is_known("Ghost").await.unwrap());
        assert!(!registry.is_online("Ghost").await.unwrap());
        assert!(registry.identity("Ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn join_marks_online_and_publishes() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let registry = registry().with_events(tx);
        let id = PlayerId::new();

        registry.record_join(id, "Alice", "[VIP] Alice");

        assert!(registry.is_online("ALICE").await.unwrap());
        let identity = registry.identity("Alice").await.unwrap().unwrap();
        assert_eq!(identity.display_name, "[VIP] Alice");
        assert_eq!(
            rx.recv().await,
            Some(PlayerEvent::Joined {
                player_id: id,
                name: "Alice".to_string()
            })
        );
    }

    #[tokio::test]
    async fn quit_clears_position_and_publishes() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let registry = registry().with_events(tx);
        let id = PlayerId::new();
        registry.record_join(id, "Alice", "Alice");
        assert!(registry.update_position(id, "world", 10.5, 64.0, -2.5));

        assert!(registry.record_quit(id));
        assert!(!registry.is_online("Alice").await.unwrap());
        assert!(registry.online_snapshot(id).await.unwrap().is_none());
        assert!(!registry.update_position(id, "world", 0.0, 0.0, 0.0));

        let _join = rx.recv().await;
        assert_eq!(rx.recv().await.map(|e| e.kind()), Some("quit"));
    }

    #[tokio::test]
    async fn first_session_has_not_played_before_until_quit() {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 5, 5, 10, 0, 0).unwrap()));
        let registry = InMemoryPlayerRegistry::new(20, "test-server 1.0", clock.clone());
        let id = PlayerId::new();
        let joined_at = clock.now();

        registry.record_join(id, "Newbie", "Newbie");
        assert!(!registry.is_known("newbie").await.unwrap());
        let identity = registry.identity("Newbie").await.unwrap().unwrap();
        assert!(!identity.has_played_before());
        assert_eq!(identity.first_seen, None);

        clock.advance(chrono::Duration::hours(2));
        registry.record_quit(id);
        let identity = registry.identity("Newbie").await.unwrap().unwrap();
        assert!(registry.is_known("newbie").await.unwrap());
        assert_eq!(identity.first_seen, Some(joined_at));

        clock.advance(chrono::Duration::days(1));
        registry.record_join(id, "Newbie", "Newbie");
        let identity = registry.identity("Newbie").await.unwrap().unwrap();
        assert_eq!(identity.first_seen, Some(joined_at));
        assert!(registry.is_known("newbie").await.unwrap());
    }

    #[derive(Default)]
    struct RecordingListener(std::sync::Mutex<Vec<&'static str>>);

    impl PlayerEventListener for RecordingListener {
        fn on_player_event(&self, event: &PlayerEvent) {
            self.0.lock().unwrap().push(event.kind());
        }
    }

    #[test]
    fn listener_is_notified_before_hooks_return() {
        let registry = registry();
        let listener = Arc::new(RecordingListener::default());
        assert!(registry.attach_listener(listener.clone()));
        assert!(!registry.attach_listener(Arc::new(RecordingListener::default())));
        let id = PlayerId::new();

        registry.record_join(id, "Alice", "Alice");
        assert_eq!(*listener.0.lock().unwrap(), vec!["join"]);
        registry.record_quit(id);
        assert_eq!(*listener.0.lock().unwrap(), vec!["join", "quit"]);
        assert!(!registry.record_quit(PlayerId::new()));
        assert_eq!(listener.0.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn rename_moves_name_index() {
        let registry = registry();
        let id = PlayerId::new();
        registry.record_join(id, "OldName", "OldName");
        registry.record_join(id, "NewName", "NewName");

        assert!(registry.identity("OldName").await.unwrap().is_none());
        assert_eq!(registry.identity("newname").await.unwrap().unwrap().id, id);
    }

    #[tokio::test]
    async fn online_players_lists_only_online() {
        let registry = registry();
        let alice = PlayerId::new();
        let bob = PlayerId::new();
        registry.record_join(alice, "Alice", "Alice");
        registry.record_join(bob, "Bob", "Bob");
        registry.record_quit(bob);

        assert_eq!(
            registry.online_players().await.unwrap(),
            vec![(alice, "Alice".to_string())]
        );
        assert_eq!(registry.online_count(), 1);
        assert_eq!(registry.max_players(), 20);
    }

    #[tokio::test]
    async fn seeded_offline_player_is_known() {
        let registry = registry();
        let first = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        registry.insert_known(PlayerIdentity::new(PlayerId::new(), "Carol").with_first_seen(first));

        assert!(registry.is_known("carol").await.unwrap());
        assert!(!registry.is_online("carol").await.unwrap());
    }
}
