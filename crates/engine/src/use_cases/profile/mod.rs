//! Profile aggregation.
//!
//! Builds a player's public profile from the registry, the rank resolver,
//! the timezone store and the optional AFK integration, and caches the result
//! by folded name.

use std::sync::Arc;

use playerinfo_domain::{account_age_days, ProfileSnapshot, DEFAULT_RANK};

use crate::infrastructure::ports::{AfkPort, ClockPort, PlayerRegistryPort, RegistryError};
use crate::stores::{PlayerDataCache, TimeZoneStore};
use crate::use_cases::rank::RankResolver;

/// Settings that shape the assembled document.
#[derive(Debug, Clone)]
pub struct ProfileSettings {
    pub include_location: bool,
    pub avatar_base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// Never played and not online.
    #[error("Player not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Use case for fetching one player's profile.
///
/// Concurrent misses for the same name are not coalesced; each one
/// aggregates and the last write to the cache wins.
pub struct GetProfile {
    registry: Arc<dyn PlayerRegistryPort>,
    ranks: Arc<RankResolver>,
    timezones: Arc<TimeZoneStore>,
    afk: Option<Arc<dyn AfkPort>>,
    cache: Arc<PlayerDataCache>,
    clock: Arc<dyn ClockPort>,
    settings: ProfileSettings,
}

impl GetProfile {
    pub fn new(
        registry: Arc<dyn PlayerRegistryPort>,
        ranks: Arc<RankResolver>,
        timezones: Arc<TimeZoneStore>,
        afk: Option<Arc<dyn AfkPort>>,
        cache: Arc<PlayerDataCache>,
        clock: Arc<dyn ClockPort>,
        settings: ProfileSettings,
    ) -> Self {
        Self {
            registry,
            ranks,
            timezones,
            afk,
            cache,
            clock,
            settings,
        }
    }

    pub async fn execute(&self, name: &str) -> Result<Arc<ProfileSnapshot>, ProfileError> {
        if let Some(cached) = self.cache.get(name) {
            return Ok(cached);
        }

        let is_online = self.registry.is_online(name).await?;
        if !is_online && !self.registry.is_known(name).await? {
            return Err(ProfileError::NotFound(name.to_string()));
        }
        let identity = self
            .registry
            .identity(name)
            .await?
            .ok_or_else(|| ProfileError::NotFound(name.to_string()))?;
        let player_id = identity.id;

        let (rank, rank_info) = match self.ranks.resolve(player_id).await {
            Some(info) => (info.display_name.clone(), Some(info)),
            None => (DEFAULT_RANK.to_string(), None),
        };

        // An online player on their first session has no first-seen stamp yet
        // and reports zero for both fields.
        let (first_joined, account_age) = match identity.first_seen {
            Some(first_seen) => (
                first_seen.timestamp_millis(),
                account_age_days(first_seen, self.clock.now()),
            ),
            None => (0, 0),
        };

        let mut snapshot = ProfileSnapshot {
            username: identity.name.clone(),
            uuid: player_id,
            is_online,
            last_seen: identity.last_seen_millis(),
            rank,
            rank_info,
            account_age,
            first_joined,
            display_name: None,
            timezone: None,
            afk: None,
            location: None,
            avatar_url: format!("{}{}", self.settings.avatar_base_url, name),
        };

        if is_online {
            snapshot.display_name = Some(identity.display_name.clone());
            snapshot.timezone = Some(self.timezones.get(player_id));

            if self.settings.include_location {
                snapshot.location = match self.registry.online_snapshot(player_id).await {
                    Ok(position) => position.map(|p| p.block_location()),
                    Err(e) => {
                        tracing::warn!(player_id = %player_id, error = %e, "Failed to read player location");
                        None
                    }
                };
            }

            if let Some(afk) = &self.afk {
                snapshot.afk = match afk.is_afk(player_id).await {
                    Ok(status) => Some(status),
                    Err(e) => {
                        tracing::warn!(player_id = %player_id, error = %e, "Failed to read AFK status");
                        None
                    }
                };
            }
        }

        let snapshot = Arc::new(snapshot);
        self.cache.put(name, snapshot.clone());
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{DateTime, TimeZone, Utc};
    use playerinfo_domain::{OnlineSnapshot, PlayerId, PlayerIdentity, ProfileLocation};

    use super::*;
    use crate::infrastructure::clock::{FixedClock, ManualClock};
    use crate::infrastructure::ports::{
        AfkError, GroupRecord, MockAfkPort, MockPermissionPort, MockPlayerRegistryPort,
        MockTimeZoneRepo, UserRecord,
    };

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn settings() -> ProfileSettings {
        ProfileSettings {
            include_location: true,
            avatar_base_url: "https://mc-heads.net/avatar/".to_string(),
        }
    }

    fn timezones() -> Arc<TimeZoneStore> {
        Arc::new(TimeZoneStore::new(
            Arc::new(MockTimeZoneRepo::new()),
            "Europe/Berlin",
            false,
        ))
    }

    struct Fixture {
        registry: MockPlayerRegistryPort,
        ranks: RankResolver,
        afk: Option<Arc<dyn AfkPort>>,
        cache: Arc<PlayerDataCache>,
        clock: Arc<dyn ClockPort>,
        settings: ProfileSettings,
    }

    impl Fixture {
        fn new() -> Self {
            let clock: Arc<dyn ClockPort> = Arc::new(FixedClock(now()));
            Self {
                registry: MockPlayerRegistryPort::new(),
                ranks: RankResolver::new(None, true, Duration::from_secs(5)),
                afk: None,
                cache: Arc::new(PlayerDataCache::new(
                    Duration::from_secs(300),
                    clock.clone(),
                    false,
                )),
                clock,
                settings: settings(),
            }
        }

        fn build(self) -> GetProfile {
            GetProfile::new(
                Arc::new(self.registry),
                Arc::new(self.ranks),
                timezones(),
                self.afk,
                self.cache,
                self.clock,
                self.settings,
            )
        }
    }

    fn expect_online_alice(registry: &mut MockPlayerRegistryPort, id: PlayerId, first_seen: DateTime<Utc>) {
        registry.expect_is_online().times(1).returning(|_| Ok(true));
        registry.expect_is_known().times(0);
        registry.expect_identity().times(1).returning(move |_| {
            Ok(Some(
                PlayerIdentity::new(id, "Alice")
                    .with_display_name("[VIP] Alice")
                    .with_first_seen(first_seen)
                    .with_last_seen(now()),
            ))
        });
        registry
            .expect_online_snapshot()
            .times(1)
            .returning(|_| Ok(Some(OnlineSnapshot::new("world", 10.7, 64.0, -2.3))));
    }

    fn vip_permissions() -> MockPermissionPort {
        let mut permissions = MockPermissionPort::new();
        permissions
            .expect_load_user()
            .times(1)
            .returning(|id| Ok(Some(UserRecord::new(id, "vip"))));
        permissions.expect_group().times(1).returning(|_| {
            Ok(Some(GroupRecord {
                name: "vip".to_string(),
                weight: Some(10),
                prefix: None,
            }))
        });
        permissions
    }

    #[tokio::test]
    async fn unknown_offline_player_is_not_found() {
        let mut fixture = Fixture::new();
        fixture.registry.expect_is_online().returning(|_| Ok(false));
        fixture.registry.expect_is_known().returning(|_| Ok(false));
        fixture.registry.expect_identity().times(0);
        let cache = fixture.cache.clone();

        let err = fixture.build().execute("Ghost").await.unwrap_err();
        assert!(matches!(err, ProfileError::NotFound(name) if name == "Ghost"));
        assert_eq!(cache.size(), 0);
    }

    #[tokio::test]
    async fn registry_failure_is_not_reported_as_not_found() {
        let mut fixture = Fixture::new();
        fixture
            .registry
            .expect_is_online()
            .returning(|_| Err(RegistryError::Unavailable));

        let err = fixture.build().execute("Alice").await.unwrap_err();
        assert!(matches!(err, ProfileError::Registry(RegistryError::Unavailable)));
    }

    #[tokio::test]
    async fn assembles_online_profile() {
        let id = PlayerId::new();
        let first_seen = now() - chrono::Duration::days(12) - chrono::Duration::hours(5);
        let mut fixture = Fixture::new();
        expect_online_alice(&mut fixture.registry, id, first_seen);
        fixture.ranks = RankResolver::new(
            Some(Arc::new(vip_permissions())),
            true,
            Duration::from_secs(5),
        );

        let profile = fixture.build().execute("Alice").await.unwrap();

        assert_eq!(profile.username, "Alice");
        assert_eq!(profile.uuid, id);
        assert!(profile.is_online);
        assert_eq!(profile.rank, "Vip");
        assert_eq!(profile.rank_info.as_ref().unwrap().weight, Some(10));
        assert_eq!(profile.account_age, 12);
        assert_eq!(profile.first_joined, first_seen.timestamp_millis());
        assert_eq!(profile.last_seen, now().timestamp_millis());
        assert_eq!(profile.display_name.as_deref(), Some("[VIP] Alice"));
        assert_eq!(profile.timezone.as_deref(), Some("Europe/Berlin"));
        assert_eq!(
            profile.location,
            Some(ProfileLocation {
                world: "world".to_string(),
                x: 10,
                y: 64,
                z: -3,
            })
        );
        assert_eq!(profile.afk, None);
        assert_eq!(profile.avatar_url, "https://mc-heads.net/avatar/Alice");
    }

    #[tokio::test]
    async fn second_request_is_served_from_cache() {
        let id = PlayerId::new();
        let mut fixture = Fixture::new();
        expect_online_alice(&mut fixture.registry, id, now());
        fixture.ranks = RankResolver::new(
            Some(Arc::new(vip_permissions())),
            true,
            Duration::from_secs(5),
        );
        let get_profile = fixture.build();

        let first = get_profile.execute("Alice").await.unwrap();
        let second = get_profile.execute("alice").await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            serde_json::to_vec(&*first).unwrap(),
            serde_json::to_vec(&*second).unwrap()
        );
    }

    #[tokio::test]
    async fn invalidated_entry_is_reaggregated() {
        let id = PlayerId::new();
        let mut fixture = Fixture::new();
        fixture.registry.expect_is_online().times(2).returning(|_| Ok(false));
        fixture.registry.expect_is_known().times(2).returning(|_| Ok(true));
        fixture
            .registry
            .expect_identity()
            .times(2)
            .returning(move |_| Ok(Some(PlayerIdentity::new(id, "Alice").with_first_seen(now()))));
        let cache = fixture.cache.clone();
        let get_profile = fixture.build();

        get_profile.execute("Alice").await.unwrap();
        assert!(cache.invalidate("ALICE"));
        get_profile.execute("Alice").await.unwrap();
    }

    #[tokio::test]
    async fn avatar_url_uses_requested_name() {
        let id = PlayerId::new();
        let mut fixture = Fixture::new();
        fixture.registry.expect_is_online().returning(|_| Ok(false));
        fixture.registry.expect_is_known().returning(|_| Ok(true));
        fixture
            .registry
            .expect_identity()
            .returning(move |_| Ok(Some(PlayerIdentity::new(id, "Alice").with_first_seen(now()))));

        let profile = fixture.build().execute("alice").await.unwrap();
        assert_eq!(profile.username, "Alice");
        assert_eq!(profile.avatar_url, "https://mc-heads.net/avatar/alice");
    }

    #[tokio::test]
    async fn zero_duration_always_reaggregates() {
        let id = PlayerId::new();
        let mut fixture = Fixture::new();
        fixture.cache.set_duration(Duration::ZERO);
        fixture.registry.expect_is_online().times(3).returning(|_| Ok(false));
        fixture.registry.expect_is_known().times(3).returning(|_| Ok(true));
        fixture
            .registry
            .expect_identity()
            .times(3)
            .returning(move |_| Ok(Some(PlayerIdentity::new(id, "Bob").with_first_seen(now()))));
        let get_profile = fixture.build();

        for _ in 0..3 {
            get_profile.execute("Bob").await.unwrap();
        }
    }

    #[tokio::test]
    async fn expired_entry_is_reaggregated() {
        let id = PlayerId::new();
        let clock = Arc::new(ManualClock::new(now()));
        let clock_port: Arc<dyn ClockPort> = clock.clone();
        let mut fixture = Fixture::new();
        fixture.clock = clock_port.clone();
        fixture.cache = Arc::new(PlayerDataCache::new(
            Duration::from_secs(60),
            clock_port,
            false,
        ));
        fixture.registry.expect_is_online().times(2).returning(|_| Ok(false));
        fixture.registry.expect_is_known().times(2).returning(|_| Ok(true));
        fixture
            .registry
            .expect_identity()
            .times(2)
            .returning(move |_| Ok(Some(PlayerIdentity::new(id, "Carol").with_first_seen(now()))));
        let get_profile = fixture.build();

        get_profile.execute("Carol").await.unwrap();
        clock.advance(chrono::Duration::seconds(61));
        get_profile.execute("Carol").await.unwrap();
    }

    #[tokio::test]
    async fn offline_profile_omits_live_fields() {
        let id = PlayerId::new();
        let mut fixture = Fixture::new();
        fixture.registry.expect_is_online().returning(|_| Ok(false));
        fixture.registry.expect_is_known().returning(|_| Ok(true));
        fixture.registry.expect_identity().returning(move |_| {
            Ok(Some(
                PlayerIdentity::new(id, "Dave")
                    .with_first_seen(now() - chrono::Duration::days(400))
                    .with_last_seen(now() - chrono::Duration::days(3)),
            ))
        });
        fixture.registry.expect_online_snapshot().times(0);
        let mut afk = MockAfkPort::new();
        afk.expect_is_afk().times(0);
        let afk: Arc<dyn AfkPort> = Arc::new(afk);
        fixture.afk = Some(afk);

        let profile = fixture.build().execute("Dave").await.unwrap();
        assert!(!profile.is_online);
        assert_eq!(profile.rank, "Default");
        assert!(profile.rank_info.is_none());
        assert_eq!(profile.account_age, 400);
        assert!(profile.display_name.is_none());
        assert!(profile.timezone.is_none());
        assert!(profile.location.is_none());
        assert!(profile.afk.is_none());
    }

    #[tokio::test]
    async fn first_session_player_reports_zero_age() {
        let id = PlayerId::new();
        let mut fixture = Fixture::new();
        fixture.registry.expect_is_online().returning(|_| Ok(true));
        fixture
            .registry
            .expect_identity()
            .returning(move |_| Ok(Some(PlayerIdentity::new(id, "Newbie"))));
        fixture.registry.expect_online_snapshot().returning(|_| Ok(None));

        let profile = fixture.build().execute("Newbie").await.unwrap();
        assert!(profile.is_online);
        assert_eq!(profile.first_joined, 0);
        assert_eq!(profile.account_age, 0);
        assert!(profile.location.is_none());
    }

    #[tokio::test]
    async fn afk_and_location_failures_degrade() {
        let id = PlayerId::new();
        let mut fixture = Fixture::new();
        fixture.registry.expect_is_online().returning(|_| Ok(true));
        fixture
            .registry
            .expect_identity()
            .returning(move |_| Ok(Some(PlayerIdentity::new(id, "Eve").with_first_seen(now()))));
        fixture
            .registry
            .expect_online_snapshot()
            .returning(|_| Err(RegistryError::query("online_snapshot", "world unloaded")));
        let mut afk = MockAfkPort::new();
        afk.expect_is_afk()
            .returning(|_| Err(AfkError::LookupFailed("plugin disabled".into())));
        let afk: Arc<dyn AfkPort> = Arc::new(afk);
        fixture.afk = Some(afk);

        let profile = fixture.build().execute("Eve").await.unwrap();
        assert!(profile.location.is_none());
        assert!(profile.afk.is_none());
        assert_eq!(profile.timezone.as_deref(), Some("Europe/Berlin"));
    }

    #[tokio::test]
    async fn afk_status_and_location_gate() {
        let id = PlayerId::new();
        let mut fixture = Fixture::new();
        fixture.settings.include_location = false;
        fixture.registry.expect_is_online().returning(|_| Ok(true));
        fixture
            .registry
            .expect_identity()
            .returning(move |_| Ok(Some(PlayerIdentity::new(id, "Finn").with_first_seen(now()))));
        fixture.registry.expect_online_snapshot().times(0);
        let mut afk = MockAfkPort::new();
        afk.expect_is_afk()
            .withf(move |player| *player == id)
            .returning(|_| Ok(true));
        let afk: Arc<dyn AfkPort> = Arc::new(afk);
        fixture.afk = Some(afk);

        let profile = fixture.build().execute("Finn").await.unwrap();
        assert_eq!(profile.afk, Some(true));
        assert!(profile.location.is_none());
    }
}
