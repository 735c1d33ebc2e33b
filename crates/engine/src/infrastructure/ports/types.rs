//! Records returned by external collaborators.

use std::collections::BTreeMap;

use playerinfo_domain::PlayerId;

/// A user record as loaded from the permission system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub player_id: PlayerId,
    pub primary_group: String,
    /// Inheritance nodes in the order the permission system reports them
    pub inherited_groups: Vec<String>,
    /// Explicitly set permission nodes; anything absent is undefined
    pub permissions: BTreeMap<String, bool>,
}

impl UserRecord {
    pub fn new(player_id: PlayerId, primary_group: impl Into<String>) -> Self {
        let primary_group = primary_group.into();
        Self {
            player_id,
            inherited_groups: vec![primary_group.clone()],
            primary_group,
            permissions: BTreeMap::new(),
        }
    }

    pub fn with_inherited_groups(mut self, groups: Vec<String>) -> Self {
        self.inherited_groups = groups;
        self
    }

    pub fn with_permission(mut self, node: impl Into<String>, value: bool) -> Self {
        self.permissions.insert(node.into(), value);
        self
    }

    /// Tri-state lookup: `None` when the node is not set for this user.
    pub fn permission(&self, node: &str) -> Option<bool> {
        self.permissions.get(node).copied()
    }
}

/// Group-level display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupRecord {
    pub name: String,
    pub weight: Option<i32>,
    pub prefix: Option<String>,
}
