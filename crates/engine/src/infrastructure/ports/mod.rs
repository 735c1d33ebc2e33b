//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - The game server's player registry
//! - The permission system client (optional at runtime)
//! - The AFK-status integration (optional at runtime)
//! - Timezone persistence (could swap JSON file -> database)
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;
pub mod types;

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{AfkPort, PermissionPort, PlayerEventListener, PlayerRegistryPort};

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::TimeZoneRepo;

pub use types::{GroupRecord, UserRecord};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::{MockAfkPort, MockPermissionPort, MockPlayerRegistryPort};

#[cfg(test)]
pub use repos::MockTimeZoneRepo;

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::{AfkError, PermissionError, RegistryError, RepoError};
