//! Allow/deny resolution for gated commands.

use std::collections::{BTreeSet, HashMap};

use crate::domain::entities::{Caller, PermissionOverrideTable};

/// Static rules the resolver applies before and after consulting overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionPolicy {
    /// Commands that bypass overrides entirely.
    pub ignored_commands: BTreeSet<String>,
    /// Outcome for commands that have no override entry.
    pub defaults: HashMap<String, bool>,
    /// Whether administrators skip override checks.
    pub admin_bypass: bool,
}

impl Default for PermissionPolicy {
    fn default() -> Self {
        Self {
            ignored_commands: ["permissions remove", "permissions allow", "permissions list"]
                .into_iter()
                .map(String::from)
                .collect(),
            defaults: HashMap::from([
                ("7tv emote add".to_string(), false),
                ("permissions list".to_string(), true),
            ]),
            admin_bypass: true,
        }
    }
}

impl PermissionPolicy {
    /// Returns whether overrides are ignored for a command.
    #[must_use]
    pub fn is_ignored(&self, command: &str) -> bool {
        self.ignored_commands.contains(command)
    }

    /// Returns the static default for a command. Unlisted commands are denied.
    #[must_use]
    pub fn default_for(&self, command: &str) -> bool {
        self.defaults.get(command).copied().unwrap_or(false)
    }
}

/// Which rule decided a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Command is on the ignored list.
    Ignored,
    /// Caller is an administrator and the policy lets them bypass overrides.
    AdministratorBypass,
    /// Caller's user id or one of its roles is on the override lists.
    Override,
    /// No override entry exists; the static default applied.
    Default(bool),
    /// An override entry exists and the caller is not on it.
    NotListed,
}

impl Resolution {
    /// Returns whether the caller may run the command.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        match self {
            Self::Ignored | Self::AdministratorBypass | Self::Override => true,
            Self::Default(value) => value,
            Self::NotListed => false,
        }
    }
}

/// Resolves whether a caller may invoke a command.
#[derive(Debug, Clone, Default)]
pub struct PermissionResolver {
    policy: PermissionPolicy,
}

impl PermissionResolver {
    /// Creates a resolver for a policy.
    #[must_use]
    pub const fn new(policy: PermissionPolicy) -> Self {
        Self { policy }
    }

    /// Returns the policy in use.
    #[must_use]
    pub const fn policy(&self) -> &PermissionPolicy {
        &self.policy
    }

    /// Evaluates the rules in order and reports which one decided.
    #[must_use]
    pub fn resolve(
        &self,
        caller: &Caller,
        command: &str,
        table: &PermissionOverrideTable,
    ) -> Resolution {
        if self.policy.is_ignored(command) {
            return Resolution::Ignored;
        }

        if self.policy.admin_bypass && caller.is_administrator() {
            return Resolution::AdministratorBypass;
        }

        match table.get(command) {
            Some(entry) if entry.allows(caller) => Resolution::Override,
            Some(_) => Resolution::NotListed,
            None => Resolution::Default(self.policy.default_for(command)),
        }
    }

    /// Returns whether the caller may invoke the command.
    #[must_use]
    pub fn is_allowed(
        &self,
        caller: &Caller,
        command: &str,
        table: &PermissionOverrideTable,
    ) -> bool {
        self.resolve(caller, command, table).is_allowed()
    }
}
