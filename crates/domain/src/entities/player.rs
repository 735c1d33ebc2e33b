//! Player identity as reported by the game server's player registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::profile::ProfileLocation;
use crate::PlayerId;

/// A player the registry has a record of.
///
/// The UUID is authoritative everywhere except the profile cache, which is
/// keyed by the folded name because lookups arrive by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub id: PlayerId,
    /// Account name as last seen by the server
    pub name: String,
    /// Display name while online (may carry nicknames or formatting)
    pub display_name: String,
    /// `None` when the player has never completed a join
    pub first_seen: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
}

impl PlayerIdentity {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id,
            display_name: name.clone(),
            name,
            first_seen: None,
            last_seen: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_first_seen(mut self, first_seen: DateTime<Utc>) -> Self {
        self.first_seen = Some(first_seen);
        self
    }

    pub fn with_last_seen(mut self, last_seen: DateTime<Utc>) -> Self {
        self.last_seen = Some(last_seen);
        self
    }

    pub fn has_played_before(&self) -> bool {
        self.first_seen.is_some()
    }

    /// Last-seen timestamp in epoch millis, `0` if never recorded.
    pub fn last_seen_millis(&self) -> i64 {
        self.last_seen.map_or(0, |t| t.timestamp_millis())
    }
}

/// Live position of an online player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnlineSnapshot {
    pub world: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl OnlineSnapshot {
    pub fn new(world: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
        }
    }

    /// Truncate to the containing block (floor, so -0.5 lands in block -1).
    pub fn block_location(&self) -> ProfileLocation {
        ProfileLocation {
            world: self.world.clone(),
            x: self.x.floor() as i32,
            y: self.y.floor() as i32,
            z: self.z.floor() as i32,
        }
    }
}

/// Case-fold a player name for name-keyed lookups.
pub fn fold_name(name: &str) -> String {
    name.to_lowercase()
}
