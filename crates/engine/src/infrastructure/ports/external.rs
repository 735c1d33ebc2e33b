//! External collaborator ports (player registry, permission system, AFK status).

use async_trait::async_trait;
use playerinfo_domain::{OnlineSnapshot, PlayerEvent, PlayerId, PlayerIdentity};

use super::error::{AfkError, PermissionError, RegistryError};
use super::types::{GroupRecord, UserRecord};

// =============================================================================
// Player Registry
// =============================================================================

/// The game server's view of known and online players.
///
/// Name arguments are matched case-insensitively.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayerRegistryPort: Send + Sync {
    /// True if the player has joined at least once.
    async fn is_known(&self, name: &str) -> Result<bool, RegistryError>;
    async fn is_online(&self, name: &str) -> Result<bool, RegistryError>;
    async fn identity(&self, name: &str) -> Result<Option<PlayerIdentity>, RegistryError>;
    /// Live position, `None` when the player is not online.
    async fn online_snapshot(&self, id: PlayerId) -> Result<Option<OnlineSnapshot>, RegistryError>;
    async fn online_players(&self) -> Result<Vec<(PlayerId, String)>, RegistryError>;
    fn max_players(&self) -> u32;
    fn server_version(&self) -> String;
}

/// Receives join/quit transitions synchronously, before the registry hook
/// returns.
pub trait PlayerEventListener: Send + Sync {
    fn on_player_event(&self, event: &PlayerEvent);
}

// =============================================================================
// Permission System
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionPort: Send + Sync {
    /// Load a user record. May block on the permission system's storage.
    async fn load_user(&self, id: PlayerId) -> Result<Option<UserRecord>, PermissionError>;
    async fn group(&self, name: &str) -> Result<Option<GroupRecord>, PermissionError>;
}

// =============================================================================
// AFK Status
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AfkPort: Send + Sync {
    async fn is_afk(&self, id: PlayerId) -> Result<bool, AfkError>;
}
