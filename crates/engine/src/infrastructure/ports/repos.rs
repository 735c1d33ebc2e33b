//! Persistence port for the durable timezone section.

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::error::RepoError;

/// Durable key-value section holding player timezone labels.
///
/// Keys are raw stored identifiers; the caller validates them so malformed
/// entries can be skipped individually.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TimeZoneRepo: Send + Sync {
    async fn load_all(&self) -> Result<BTreeMap<String, String>, RepoError>;
    /// Replace the stored section with `entries`.
    async fn save_all(&self, entries: &BTreeMap<String, String>) -> Result<(), RepoError>;
}
