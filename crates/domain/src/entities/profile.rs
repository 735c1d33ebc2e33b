//! Assembled player profile documents.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::rank::RankInfo;
use crate::PlayerId;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Block position of an online player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileLocation {
    pub world: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Public profile of one player at a point in time.
///
/// Immutable once built. Optional fields are omitted from the JSON form
/// instead of being written as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    pub username: String,
    pub uuid: PlayerId,
    pub is_online: bool,
    /// Epoch millis, `0` when never recorded
    pub last_seen: i64,
    /// Formatted rank display name, `"Default"` without rank data
    pub rank: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_info: Option<RankInfo>,
    /// Whole days since first join, `0` for never-joined players
    pub account_age: i64,
    /// Epoch millis of first join, `0` for never-joined players
    pub first_joined: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub afk: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<ProfileLocation>,
    pub avatar_url: String,
}

/// Online player listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlinePlayers {
    pub online: usize,
    pub max: u32,
    /// UUID to name, present only when at least one player is online
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub players: Option<BTreeMap<PlayerId, String>>,
}

impl OnlinePlayers {
    pub fn new(max: u32, players: impl IntoIterator<Item = (PlayerId, String)>) -> Self {
        let players: BTreeMap<PlayerId, String> = players.into_iter().collect();
        Self {
            online: players.len(),
            max,
            players: if players.is_empty() { None } else { Some(players) },
        }
    }
}

/// Whole days between `first_seen` and `now`, floored.
pub fn account_age_days(first_seen: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let elapsed = now.timestamp_millis() - first_seen.timestamp_millis();
    elapsed.div_euclid(MILLIS_PER_DAY)
}
