//! Player state transition events published by the game server.

use serde::{Deserialize, Serialize};

use crate::PlayerId;

/// A player joined or left the server.
///
/// Name, online status, location and AFK state can all change at the moment
/// of the transition, so consumers treat any cached profile for the player as
/// stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlayerEvent {
    Joined { player_id: PlayerId, name: String },
    Quit { player_id: PlayerId, name: String },
}

impl PlayerEvent {
    pub fn player_id(&self) -> PlayerId {
        match self {
            Self::Joined { player_id, .. } | Self::Quit { player_id, .. } => *player_id,
        }
    }

    /// The player's current name at the time of the event.
    pub fn name(&self) -> &str {
        match self {
            Self::Joined { name, .. } | Self::Quit { name, .. } => name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Joined { .. } => "join",
            Self::Quit { .. } => "quit",
        }
    }
}
