//! Command dispatcher.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::{debug, info};

use crate::application::{
    EmoteRegistryUseCase, GuildLocks, ImportEmoteRequest, ImportEmoteUseCase,
    ManagePermissionsUseCase,
};
use crate::domain::entities::{EmoteRegistryRecord, GuildId, RoleId, UserId};
use crate::domain::ports::{EmoteSourcePort, EmoteTranscoderPort, GuildStorePort};
use crate::domain::services::{PermissionResolver, Resolution};
use crate::infrastructure::AppConfig;
use crate::presentation::cli::{
    Command, EmotesCommand, ImportArgs, PermissionsCommand, TargetArgs, caller,
};

const ADD_EMOTE_COMMAND: &str = "7tv emote add";

/// Wires use cases to the command line.
pub struct App {
    import: ImportEmoteUseCase,
    permissions: ManagePermissionsUseCase,
    registry: EmoteRegistryUseCase,
}

impl App {
    /// Creates the application from its adapters.
    #[must_use]
    pub fn new(
        source: Arc<dyn EmoteSourcePort>,
        transcoder: Arc<dyn EmoteTranscoderPort>,
        store: Arc<dyn GuildStorePort>,
        config: &AppConfig,
    ) -> Self {
        let locks = Arc::new(GuildLocks::new());
        let resolver = PermissionResolver::new(config.permissions.policy());

        Self {
            import: ImportEmoteUseCase::new(source, transcoder),
            permissions: ManagePermissionsUseCase::new(
                store.clone(),
                resolver,
                config.permissions.known_commands.iter().cloned(),
                locks.clone(),
            ),
            registry: EmoteRegistryUseCase::new(store, locks),
        }
    }

    /// Runs one command to completion.
    ///
    /// # Errors
    /// Returns error if the command fails.
    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Import(args) => self.import(args).await,
            Command::Permissions(cmd) => self.permissions(cmd).await,
            Command::Emotes(cmd) => self.emotes(cmd).await,
        }
    }

    async fn import(&self, args: ImportArgs) -> Result<()> {
        let member = args.caller();
        if let Some((guild_id, caller)) = &member {
            self.permissions
                .authorize(*guild_id, caller, ADD_EMOTE_COMMAND)
                .await?;
        }

        let mut request = ImportEmoteRequest::new(&args.emote).square(args.square);
        if let Some(name) = &args.name {
            request = request.with_name(name);
        }

        let response = match self.import.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                let message = e.user_message();
                return Err(eyre!(e).wrap_err(message));
            }
        };
        let emote = &response.emote;

        // Record first so a rejected record leaves nothing on disk.
        if let (Some((guild_id, caller)), Some(emoji_id)) = (&member, args.emoji_id) {
            self.registry
                .register_emote(*guild_id, caller.user_id, emote, emoji_id)
                .await?;
            println!("Recorded emoji {emoji_id} for <@{}>", caller.user_id);
        }

        let output = args.output.clone().unwrap_or_else(|| {
            PathBuf::from(format!("{}.{}", response.emoji_name, emote.format.extension()))
        });
        tokio::fs::write(&output, &emote.bytes)
            .await
            .wrap_err_with(|| format!("failed to write {}", output.display()))?;

        info!(path = %output.display(), size = emote.bytes.len(), "Wrote emote");
        println!(
            "{} -> {} ({}x{}, {} bytes, {})",
            emote.source_url,
            output.display(),
            emote.width,
            emote.height,
            emote.bytes.len(),
            response.emoji_name,
        );

        Ok(())
    }

    async fn permissions(&self, command: PermissionsCommand) -> Result<()> {
        match command {
            PermissionsCommand::Allow {
                guild,
                command,
                target,
            } => self.register(guild, &command, &target, true).await,
            PermissionsCommand::Remove {
                guild,
                command,
                target,
            } => self.register(guild, &command, &target, false).await,
            PermissionsCommand::List { guild, command } => {
                let overrides = self.permissions.command_overrides(guild, &command).await?;
                println!("{}", format_overrides(&command, &overrides.roles, &overrides.users));
                Ok(())
            }
            PermissionsCommand::Check {
                guild,
                command,
                user,
                roles,
                admin,
            } => {
                let caller = caller(user, &roles, admin, false);
                let resolution = self.permissions.check(guild, &caller, &command).await?;
                println!("{}", describe_resolution(&command, resolution));
                Ok(())
            }
        }
    }

    async fn register(
        &self,
        guild_id: GuildId,
        command: &str,
        target: &TargetArgs,
        allow: bool,
    ) -> Result<()> {
        let target = target
            .target()
            .ok_or_else(|| eyre!("either --role or --user is required"))?;

        let changed = self
            .permissions
            .register_permission(guild_id, &target, command, allow)
            .await?;

        let verb = if allow { "Allowed" } else { "Removed" };
        if changed {
            println!("{verb} {} for `/{command}`", target.mention());
        } else {
            println!("Nothing changed for {} on `/{command}`", target.mention());
        }
        Ok(())
    }

    async fn emotes(&self, command: EmotesCommand) -> Result<()> {
        match command {
            EmotesCommand::List { guild, author } => {
                let records = self.registry.list(guild).await?;
                let records: Vec<&EmoteRegistryRecord> = records
                    .iter()
                    .filter(|r| author.is_none_or(|a| r.author_id == a))
                    .collect();

                if records.is_empty() {
                    println!("No emotes recorded");
                }
                for record in records {
                    println!("{}", format_record(record));
                }
                Ok(())
            }
            EmotesCommand::Forget {
                guild,
                emoji_id,
                user,
                admin,
                manage_emojis,
            } => {
                let caller = caller(user, &[], admin, manage_emojis);
                match self.registry.remove_emote(guild, &caller, emoji_id).await? {
                    Some(record) => println!("Forgot {}", format_record(&record)),
                    None => println!("Emoji {emoji_id} is not recorded"),
                }
                Ok(())
            }
            EmotesCommand::Prune { guild, present } => {
                let present: HashSet<_> = present.into_iter().collect();
                debug!(guild_id = %guild, present = present.len(), "Pruning emote records");

                let removed = self
                    .registry
                    .unregister_deleted_emotes(guild, &present)
                    .await?;
                println!("Removed {} stale record(s)", removed.len());
                Ok(())
            }
        }
    }
}

fn format_record(record: &EmoteRegistryRecord) -> String {
    format!(
        "{} {} by <@{}>{}",
        record.emoji_id,
        record.source_id,
        record.author_id,
        if record.animated { " (animated)" } else { "" }
    )
}

fn format_overrides<'a>(
    command: &str,
    roles: impl IntoIterator<Item = &'a RoleId>,
    users: impl IntoIterator<Item = &'a UserId>,
) -> String {
    let roles: Vec<String> = roles.into_iter().map(|r| format!("<@&{r}>")).collect();
    let users: Vec<String> = users.into_iter().map(|u| format!("<@{u}>")).collect();

    let show = |list: &[String]| {
        if list.is_empty() {
            "none".to_string()
        } else {
            list.join(", ")
        }
    };

    format!(
        "/{command}\n  roles: {}\n  users: {}",
        show(&roles),
        show(&users)
    )
}

fn describe_resolution(command: &str, resolution: Resolution) -> String {
    let verdict = if resolution.is_allowed() {
        "allowed"
    } else {
        "denied"
    };
    let reason = match resolution {
        Resolution::Ignored => "command ignores overrides".to_string(),
        Resolution::AdministratorBypass => "administrator".to_string(),
        Resolution::Override => "listed in overrides".to_string(),
        Resolution::Default(_) => "no overrides, default applied".to_string(),
        Resolution::NotListed => "not listed in overrides".to_string(),
    };
    format!("/{command}: {verdict} ({reason})")
}
