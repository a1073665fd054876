//! Permission override entities.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{RoleId, UserId};

bitflags::bitflags! {
    /// Subset of Discord guild permissions relevant to emote management.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Permissions: u64 {
        const ADMINISTRATOR = 1 << 3;
        const MANAGE_EMOJIS_AND_STICKERS = 1 << 30;
    }
}

/// Role or user an override applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionTarget {
    /// A guild role.
    Role(RoleId),
    /// A guild member together with the roles they hold.
    User(UserId, Vec<RoleId>),
}

impl PermissionTarget {
    /// Returns a user target without role information.
    #[must_use]
    pub const fn user(id: UserId) -> Self {
        Self::User(id, Vec::new())
    }

    /// Returns the Discord mention markup for the target.
    #[must_use]
    pub fn mention(&self) -> String {
        match self {
            Self::Role(id) => format!("<@&{id}>"),
            Self::User(id, _) => format!("<@{id}>"),
        }
    }
}

/// Identity of whoever invokes a gated command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// Caller user id.
    pub user_id: UserId,
    /// Roles the caller holds in the guild.
    pub roles: Vec<RoleId>,
    /// Effective guild permissions of the caller.
    pub permissions: Permissions,
}

impl Caller {
    /// Creates a caller without roles or permissions.
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            roles: Vec::new(),
            permissions: Permissions::empty(),
        }
    }

    /// Adds role memberships.
    #[must_use]
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = RoleId>) -> Self {
        self.roles.extend(roles);
        self
    }

    /// Sets the effective guild permissions.
    #[must_use]
    pub const fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    /// Returns whether the caller holds the administrator permission.
    #[must_use]
    pub const fn is_administrator(&self) -> bool {
        self.permissions.contains(Permissions::ADMINISTRATOR)
    }
}

/// Explicit allow-lists for one command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOverride {
    /// Roles allowed to use the command.
    #[serde(rename = "role", default)]
    pub roles: BTreeSet<RoleId>,
    /// Users allowed to use the command.
    #[serde(rename = "user", default)]
    pub users: BTreeSet<UserId>,
}

impl CommandOverride {
    /// Returns whether both allow-lists are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty() && self.users.is_empty()
    }

    /// Returns whether the caller matches either allow-list.
    #[must_use]
    pub fn allows(&self, caller: &Caller) -> bool {
        self.users.contains(&caller.user_id)
            || caller.roles.iter().any(|role| self.roles.contains(role))
    }
}

/// Mapping from qualified command name to its overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionOverrideTable {
    entries: BTreeMap<String, CommandOverride>,
}

impl PermissionOverrideTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the override entry for a command, if one was ever written.
    #[must_use]
    pub fn get(&self, command: &str) -> Option<&CommandOverride> {
        self.entries.get(command)
    }

    /// Adds or removes a target from a command's allow-list.
    ///
    /// The entry is created on first write. Both directions are idempotent.
    /// Returns whether the table changed.
    pub fn register(&mut self, target: &PermissionTarget, command: &str, allow: bool) -> bool {
        let entry = self.entries.entry(command.to_string()).or_default();

        match (target, allow) {
            (PermissionTarget::Role(id), true) => entry.roles.insert(*id),
            (PermissionTarget::Role(id), false) => entry.roles.remove(id),
            (PermissionTarget::User(id, _), true) => entry.users.insert(*id),
            (PermissionTarget::User(id, _), false) => entry.users.remove(id),
        }
    }

    /// Iterates over all entries in command order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommandOverride)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of command entries, empty ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no entry exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CMD: &str = "7tv emote add";

    #[test]
    fn test_register_creates_entry_lazily() {
        let mut table = PermissionOverrideTable::new();
        assert!(table.get(CMD).is_none());

        table.register(&PermissionTarget::Role(RoleId(1)), CMD, false);

        let entry = table.get(CMD).unwrap();
        assert!(entry.is_empty());
    }

    #[test]
    fn test_allow_is_idempotent() {
        let mut table = PermissionOverrideTable::new();
        let target = PermissionTarget::user(UserId(7));

        assert!(table.register(&target, CMD, true));
        assert!(!table.register(&target, CMD, true));

        assert_eq!(table.get(CMD).unwrap().users.len(), 1);
    }

    #[test]
    fn test_allow_then_remove_restores_state() {
        let mut table = PermissionOverrideTable::new();
        table.register(&PermissionTarget::Role(RoleId(3)), CMD, true);
        let before = table.clone();

        let target = PermissionTarget::user(UserId(9));
        table.register(&target, CMD, true);
        table.register(&target, CMD, false);

        assert_eq!(table, before);
    }

    #[test]
    fn test_allow_then_remove_on_fresh_command_keeps_empty_entry() {
        let mut table = PermissionOverrideTable::new();
        let target = PermissionTarget::user(UserId(9));

        table.register(&target, CMD, true);
        table.register(&target, CMD, false);

        assert_eq!(table.len(), 1);
        assert!(table.get(CMD).unwrap().is_empty());
        assert_ne!(table, PermissionOverrideTable::new());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut table = PermissionOverrideTable::new();
        table.register(&PermissionTarget::user(UserId(1)), CMD, true);

        assert!(!table.register(&PermissionTarget::user(UserId(2)), CMD, false));
        assert_eq!(table.get(CMD).unwrap().users.len(), 1);
    }

    #[test]
    fn test_role_targets_go_to_role_list() {
        let mut table = PermissionOverrideTable::new();
        table.register(&PermissionTarget::Role(RoleId(5)), CMD, true);

        let entry = table.get(CMD).unwrap();
        assert!(entry.roles.contains(&RoleId(5)));
        assert!(entry.users.is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let mut table = PermissionOverrideTable::new();
        table.register(&PermissionTarget::Role(RoleId(5)), CMD, true);

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "7tv emote add": { "role": ["5"], "user": [] } })
        );
    }

    #[test]
    fn test_mention() {
        assert_eq!(PermissionTarget::Role(RoleId(5)).mention(), "<@&5>");
        assert_eq!(PermissionTarget::user(UserId(6)).mention(), "<@6>");
    }
}
