//! Player info engine library.
//!
//! Serves live player profiles over HTTP, assembled from the game server's
//! player registry, the permission system and per-player timezone settings,
//! behind a short-lived profile cache.
//!
//! ## Structure
//!
//! - `stores/` - Process state: profile cache and timezone store
//! - `use_cases/` - Profile aggregation, rank resolution, cache invalidation
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

pub use app::App;
