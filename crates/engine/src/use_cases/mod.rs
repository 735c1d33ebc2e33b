//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific area of the player API.

pub mod admin;
pub mod events;
pub mod players;
pub mod profile;
pub mod rank;

pub use admin::{CacheStats, ManageCache};
pub use events::PlayerEventBridge;
pub use players::ListOnline;
pub use profile::{GetProfile, ProfileError, ProfileSettings};
pub use rank::RankResolver;
