//! Permission-group rank data.

use serde::{Deserialize, Serialize};

/// Rank shown for players without any resolvable group.
pub const DEFAULT_RANK: &str = "Default";

/// A player's effective permission group and its display metadata.
///
/// Built fresh per profile request and only ever cached as part of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankInfo {
    pub primary_group: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Inherited groups in the order the permission system reports them
    #[serde(rename = "allGroups")]
    pub all_groups: Vec<String>,
}

/// Format a group identifier for display.
///
/// Empty names become [`DEFAULT_RANK`]. With `title_case` the first letter is
/// upper-cased and the rest lower-cased; otherwise the identifier is returned
/// unchanged.
pub fn format_group_name(group: &str, title_case: bool) -> String {
    if group.is_empty() {
        return DEFAULT_RANK.to_string();
    }
    if !title_case {
        return group.to_string();
    }

    let mut chars = group.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => DEFAULT_RANK.to_string(),
    }
}
