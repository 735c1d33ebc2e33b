//! Domain entities.

mod player;
mod profile;
mod rank;

pub use player::{fold_name, OnlineSnapshot, PlayerIdentity};
pub use profile::{account_age_days, OnlinePlayers, ProfileLocation, ProfileSnapshot};
pub use rank::{format_group_name, RankInfo, DEFAULT_RANK};
