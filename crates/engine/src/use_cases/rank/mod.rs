//! Rank resolution against the permission system.
//!
//! Read-only and uncached. Every failure degrades to "no rank info" (or
//! `false` for permission checks) so a profile can always be produced.

use std::sync::Arc;
use std::time::Duration;

use playerinfo_domain::{format_group_name, PlayerId, RankInfo};

use crate::infrastructure::ports::{PermissionPort, UserRecord};

pub struct RankResolver {
    /// `None` when no permission system is installed.
    permissions: Option<Arc<dyn PermissionPort>>,
    title_case: bool,
    lookup_timeout: Duration,
}

impl RankResolver {
    pub fn new(
        permissions: Option<Arc<dyn PermissionPort>>,
        title_case: bool,
        lookup_timeout: Duration,
    ) -> Self {
        if permissions.is_none() {
            tracing::warn!("No permission system available, ranks will report as default");
        }
        Self {
            permissions,
            title_case,
            lookup_timeout,
        }
    }

    pub fn is_available(&self) -> bool {
        self.permissions.is_some()
    }

    /// Display form of a group identifier.
    pub fn display_name(&self, group: &str) -> String {
        format_group_name(group, self.title_case)
    }

    /// Resolve a player's effective rank.
    ///
    /// Group weight and prefix are best-effort: a failed or timed out group
    /// lookup omits them without failing the resolution.
    pub async fn resolve(&self, player_id: PlayerId) -> Option<RankInfo> {
        let permissions = self.permissions.as_ref()?;
        let user = self.load_user(permissions.as_ref(), player_id).await?;

        let lookup = permissions.group(&user.primary_group);
        let (weight, prefix) = match tokio::time::timeout(self.lookup_timeout, lookup).await {
            Ok(Ok(Some(group))) => (Some(group.weight.unwrap_or(0)), group.prefix),
            Ok(Ok(None)) => (None, None),
            Ok(Err(e)) => {
                tracing::warn!(
                    player_id = %player_id,
                    group = %user.primary_group,
                    error = %e,
                    "Failed to load group metadata"
                );
                (None, None)
            }
            Err(_) => {
                tracing::warn!(
                    player_id = %player_id,
                    group = %user.primary_group,
                    timeout_ms = self.lookup_timeout.as_millis() as u64,
                    "Group metadata lookup timed out"
                );
                (None, None)
            }
        };

        Some(RankInfo {
            display_name: self.display_name(&user.primary_group),
            primary_group: user.primary_group,
            weight,
            prefix,
            all_groups: user.inherited_groups,
        })
    }

    /// Evaluate one permission node. Anything but an explicit grant is `false`.
    pub async fn has_permission(&self, player_id: PlayerId, node: &str) -> bool {
        let Some(permissions) = self.permissions.as_ref() else {
            return false;
        };
        self.load_user(permissions.as_ref(), player_id)
            .await
            .and_then(|user| user.permission(node))
            .unwrap_or(false)
    }

    async fn load_user(
        &self,
        permissions: &dyn PermissionPort,
        player_id: PlayerId,
    ) -> Option<UserRecord> {
        match tokio::time::timeout(self.lookup_timeout, permissions.load_user(player_id)).await {
            Ok(Ok(user)) => user,
            Ok(Err(e)) => {
                tracing::warn!(player_id = %player_id, error = %e, "Failed to load permission user");
                None
            }
            Err(_) => {
                tracing::warn!(
                    player_id = %player_id,
                    timeout_ms = self.lookup_timeout.as_millis() as u64,
                    "Permission user lookup timed out"
                );
                None
            }
        }
    }
}
