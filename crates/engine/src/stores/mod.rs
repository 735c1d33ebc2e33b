//! In-memory state storage modules.
//!
//! Stores own the process state the core mutates:
//! - `PlayerDataCache` - time-bounded profile snapshots
//! - `TimeZoneStore` - per-player timezone preferences (write-through)

pub mod player_data;
pub mod timezone;

pub use player_data::PlayerDataCache;
pub use timezone::{TimeZoneError, TimeZoneStore};
