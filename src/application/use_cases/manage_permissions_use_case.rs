//! Command permission override management.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::GuildLocks;
use crate::domain::entities::{Caller, CommandOverride, GuildId, PermissionTarget};
use crate::domain::errors::PermissionError;
use crate::domain::ports::GuildStorePort;
use crate::domain::services::{PermissionResolver, Resolution};

/// Edits and evaluates per-guild command overrides.
#[derive(Clone)]
pub struct ManagePermissionsUseCase {
    store: Arc<dyn GuildStorePort>,
    resolver: PermissionResolver,
    known_commands: BTreeSet<String>,
    locks: Arc<GuildLocks>,
}

impl ManagePermissionsUseCase {
    /// Creates new permissions use case.
    ///
    /// `known_commands` is the catalog overrides may be written for.
    #[must_use]
    pub fn new(
        store: Arc<dyn GuildStorePort>,
        resolver: PermissionResolver,
        known_commands: impl IntoIterator<Item = String>,
        locks: Arc<GuildLocks>,
    ) -> Self {
        Self {
            store,
            resolver,
            known_commands: known_commands.into_iter().collect(),
            locks,
        }
    }

    /// Returns the resolver in use.
    #[must_use]
    pub const fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }

    fn validate(&self, command: &str) -> Result<(), PermissionError> {
        if !self.known_commands.contains(command) {
            return Err(PermissionError::UnknownCommand(command.to_string()));
        }
        if self.resolver.policy().is_ignored(command) {
            return Err(PermissionError::IgnoredCommand(command.to_string()));
        }
        Ok(())
    }

    /// Adds (`allow = true`) or removes a target from a command's allow-list.
    ///
    /// The guild record and the command entry are created when missing, and
    /// the record is saved even when nothing changed. Returns whether the
    /// allow-list changed.
    ///
    /// # Errors
    /// Returns [`PermissionError::UnknownCommand`] or
    /// [`PermissionError::IgnoredCommand`] before touching storage, and
    /// [`PermissionError::Store`] if the record cannot be loaded or saved.
    pub async fn register_permission(
        &self,
        guild_id: GuildId,
        target: &PermissionTarget,
        command: &str,
        allow: bool,
    ) -> Result<bool, PermissionError> {
        self.validate(command)?;

        let _guard = self.locks.lock(guild_id).await;

        let (mut settings, created) = self.store.get_or_create(guild_id).await?;
        if created {
            debug!(guild_id = %guild_id, "Created guild record");
        }

        let changed = settings.permissions.register(target, command, allow);
        self.store.save(&settings).await?;

        info!(
            guild_id = %guild_id,
            target = %target.mention(),
            command,
            allow,
            changed,
            "Permission override updated"
        );

        Ok(changed)
    }

    /// Returns the override lists of a command. Missing entries read as empty.
    ///
    /// # Errors
    /// Returns [`PermissionError::UnknownCommand`] for commands outside the
    /// catalog and [`PermissionError::Store`] if the record cannot be read.
    pub async fn command_overrides(
        &self,
        guild_id: GuildId,
        command: &str,
    ) -> Result<CommandOverride, PermissionError> {
        if !self.known_commands.contains(command) {
            return Err(PermissionError::UnknownCommand(command.to_string()));
        }

        let settings = self.store.get(guild_id).await?;
        Ok(settings
            .and_then(|s| s.permissions.get(command).cloned())
            .unwrap_or_default())
    }

    /// Evaluates whether a caller may invoke a command in a guild.
    ///
    /// Guilds without a record resolve against an empty override table.
    ///
    /// # Errors
    /// Returns [`PermissionError::Store`] if the record cannot be read.
    pub async fn check(
        &self,
        guild_id: GuildId,
        caller: &Caller,
        command: &str,
    ) -> Result<Resolution, PermissionError> {
        let settings = self.store.get(guild_id).await?;
        let resolution = match settings {
            Some(settings) => self.resolver.resolve(caller, command, &settings.permissions),
            None => self.resolver.resolve(caller, command, &Default::default()),
        };

        debug!(
            guild_id = %guild_id,
            user_id = %caller.user_id,
            command,
            ?resolution,
            "Resolved command permission"
        );

        Ok(resolution)
    }

    /// Like [`Self::check`], but turns a deny into an error.
    ///
    /// # Errors
    /// Returns [`PermissionError::Denied`] if the caller may not run the command.
    pub async fn authorize(
        &self,
        guild_id: GuildId,
        caller: &Caller,
        command: &str,
    ) -> Result<Resolution, PermissionError> {
        let resolution = self.check(guild_id, caller, command).await?;
        if resolution.is_allowed() {
            Ok(resolution)
        } else {
            warn!(guild_id = %guild_id, user_id = %caller.user_id, command, "Command denied");
            Err(PermissionError::Denied(command.to_string()))
        }
    }
}
