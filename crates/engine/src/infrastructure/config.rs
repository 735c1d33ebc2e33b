//! Application configuration

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP listener host
    pub server_host: String,
    /// HTTP listener port
    pub server_port: u16,
    /// Name reported by the status endpoint
    pub server_name: String,
    /// Max players reported by the in-memory registry
    pub max_players: u32,

    pub api: ApiConfig,
    pub player_data: PlayerDataConfig,
    pub rank: RankConfig,
    pub debug: DebugConfig,

    /// JSON file backing the timezone section
    pub timezone_data_path: PathBuf,
}

/// HTTP surface configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bearer token; empty disables authentication
    pub api_key: String,
    pub cors_enabled: bool,
    /// CORS allowed origins (comma-separated, or "*" for any)
    pub cors_allowed_origins: Vec<String>,
}

/// Profile assembly configuration
#[derive(Debug, Clone)]
pub struct PlayerDataConfig {
    /// Include world and block coordinates for online players
    pub include_location: bool,
    pub default_timezone: String,
    pub cache_duration: Duration,
    /// Prefix the username is appended to
    pub avatar_base_url: String,
}

/// Rank resolution configuration
#[derive(Debug, Clone)]
pub struct RankConfig {
    pub title_case: bool,
    /// Upper bound on a single permission-system user lookup
    pub lookup_timeout: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct DebugConfig {
    /// Log cache and event bridge activity
    pub enabled: bool,
    pub log_api_requests: bool,
    pub log_timezone_events: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            server_name: "playerinfo".to_string(),
            max_players: 20,
            api: ApiConfig {
                api_key: String::new(),
                cors_enabled: true,
                cors_allowed_origins: vec!["*".to_string()],
            },
            player_data: PlayerDataConfig {
                include_location: true,
                default_timezone: "Europe/Berlin".to_string(),
                cache_duration: Duration::from_secs(300),
                avatar_base_url: "https://mc-heads.net/avatar/".to_string(),
            },
            rank: RankConfig {
                title_case: true,
                lookup_timeout: Duration::from_millis(5000),
            },
            debug: DebugConfig::default(),
            timezone_data_path: PathBuf::from("./data/timezones.json"),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Unset or unparsable values fall back to defaults, except
    /// `SERVER_PORT` which must be a valid port when set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let string = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let flag = |key: &str, default: bool| lookup(key).and_then(|v| parse_bool(&v)).unwrap_or(default);

        let server_port = match lookup("SERVER_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            None => defaults.server_port,
        };

        Ok(Self {
            server_host: string("SERVER_HOST", &defaults.server_host),
            server_port,
            server_name: string("SERVER_NAME", &defaults.server_name),
            max_players: number(&lookup, "MAX_PLAYERS", defaults.max_players),

            api: ApiConfig {
                api_key: lookup("API_KEY").map(|k| k.trim().to_string()).unwrap_or_default(),
                cors_enabled: flag("CORS_ENABLED", defaults.api.cors_enabled),
                cors_allowed_origins: string("CORS_ALLOWED_ORIGINS", "*")
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },

            player_data: PlayerDataConfig {
                include_location: flag(
                    "PLAYER_DATA_INCLUDE_LOCATION",
                    defaults.player_data.include_location,
                ),
                default_timezone: string("DEFAULT_TIMEZONE", &defaults.player_data.default_timezone),
                cache_duration: Duration::from_secs(number(
                    &lookup,
                    "CACHE_DURATION_SECONDS",
                    defaults.player_data.cache_duration.as_secs(),
                )),
                avatar_base_url: string("AVATAR_BASE_URL", &defaults.player_data.avatar_base_url),
            },

            rank: RankConfig {
                title_case: flag("RANK_TITLE_CASE", defaults.rank.title_case),
                lookup_timeout: Duration::from_millis(number(&lookup, "RANK_LOOKUP_TIMEOUT_MS", 5000)),
            },

            debug: DebugConfig {
                enabled: flag("DEBUG", false),
                log_api_requests: flag("LOG_API_REQUESTS", false),
                log_timezone_events: flag("LOG_TIMEZONE_EVENTS", false),
            },

            timezone_data_path: lookup("TIMEZONE_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.timezone_data_path),
        })
    }

    /// Address the HTTP listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn number<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
