//! Player Info domain types.
//!
//! Identity, rank and profile data shared between the engine's stores,
//! use cases and HTTP layer. This crate performs no I/O.

pub mod entities;
pub mod error;
pub mod events;
pub mod ids;

pub use entities::{
    account_age_days, fold_name, format_group_name, OnlinePlayers, OnlineSnapshot,
    PlayerIdentity, ProfileLocation, ProfileSnapshot, RankInfo, DEFAULT_RANK,
};
pub use error::DomainError;
pub use events::PlayerEvent;
pub use ids::PlayerId;
