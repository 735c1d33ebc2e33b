//! Application state and composition.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::infrastructure::config::AppConfig;
use crate::infrastructure::ports::{
    AfkPort, ClockPort, PermissionPort, PlayerRegistryPort, TimeZoneRepo,
};
use crate::stores::{PlayerDataCache, TimeZoneStore};
use crate::use_cases::{
    GetProfile, ListOnline, ManageCache, PlayerEventBridge, ProfileSettings, RankResolver,
};

/// Main application state.
///
/// Built once at startup and passed to HTTP handlers via Axum state. Every
/// store is constructed here and shared by reference; nothing is global.
pub struct App {
    pub config: AppConfig,
    pub registry: Arc<dyn PlayerRegistryPort>,
    pub stores: Stores,
    pub use_cases: UseCases,
    request_count: AtomicU64,
}

/// Process state owned by the core.
pub struct Stores {
    pub player_data: Arc<PlayerDataCache>,
    pub timezones: Arc<TimeZoneStore>,
}

/// Container for all use cases.
pub struct UseCases {
    pub get_profile: Arc<GetProfile>,
    pub list_online: Arc<ListOnline>,
    pub ranks: Arc<RankResolver>,
    pub cache: Arc<ManageCache>,
    pub events: Arc<PlayerEventBridge>,
}

impl App {
    /// `permissions` and `afk` are `None` when the integration is not installed.
    pub fn new(
        config: AppConfig,
        registry: Arc<dyn PlayerRegistryPort>,
        permissions: Option<Arc<dyn PermissionPort>>,
        afk: Option<Arc<dyn AfkPort>>,
        timezone_repo: Arc<dyn TimeZoneRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let player_data = Arc::new(PlayerDataCache::new(
            config.player_data.cache_duration,
            clock.clone(),
            config.debug.enabled,
        ));
        let timezones = Arc::new(TimeZoneStore::new(
            timezone_repo,
            config.player_data.default_timezone.clone(),
            config.debug.log_timezone_events,
        ));
        let ranks = Arc::new(RankResolver::new(
            permissions,
            config.rank.title_case,
            config.rank.lookup_timeout,
        ));

        if afk.is_none() {
            tracing::info!("AFK integration not available, afk field will be omitted");
        }

        let get_profile = Arc::new(GetProfile::new(
            registry.clone(),
            ranks.clone(),
            timezones.clone(),
            afk,
            player_data.clone(),
            clock,
            ProfileSettings {
                include_location: config.player_data.include_location,
                avatar_base_url: config.player_data.avatar_base_url.clone(),
            },
        ));

        let use_cases = UseCases {
            get_profile,
            list_online: Arc::new(ListOnline::new(registry.clone())),
            ranks,
            cache: Arc::new(ManageCache::new(player_data.clone())),
            events: Arc::new(PlayerEventBridge::new(
                player_data.clone(),
                config.debug.enabled,
            )),
        };

        Self {
            config,
            registry,
            stores: Stores {
                player_data,
                timezones,
            },
            use_cases,
            request_count: AtomicU64::new(0),
        }
    }

    /// Count one API request and return the new total.
    pub fn record_request(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }
}
