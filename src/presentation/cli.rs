//! Command line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::entities::{
    Caller, EmojiId, GuildId, PermissionTarget, Permissions, RoleId, UserId,
};
use crate::infrastructure::CliArgs;

/// Import 7TV emotes and manage who may do so.
#[derive(Debug, Parser)]
#[command(name = "emote-porter", version, about)]
pub struct Cli {
    /// Global options.
    #[command(flatten)]
    pub args: CliArgs,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Top level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch an emote and fit it into the emoji size limit.
    Import(ImportArgs),

    /// Manage command permission overrides.
    #[command(subcommand)]
    Permissions(PermissionsCommand),

    /// Manage the registry of imported emotes.
    #[command(subcommand)]
    Emotes(EmotesCommand),
}

/// Arguments of `import`.
#[derive(Debug, Args)]
pub struct ImportArgs {
    /// 7TV emote URL or id.
    pub emote: String,

    /// Crop the emote to a square.
    #[arg(long)]
    pub square: bool,

    /// Emoji name to use instead of the emote's name.
    #[arg(long)]
    pub name: Option<String>,

    /// Output file. Defaults to `<emoji name>.<png|gif>`.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Guild to check permissions in and record the import for.
    #[arg(long, requires = "author")]
    pub guild: Option<GuildId>,

    /// Member performing the import.
    #[arg(long, requires = "guild")]
    pub author: Option<UserId>,

    /// Roles held by the member.
    #[arg(long = "role")]
    pub roles: Vec<RoleId>,

    /// The member is a guild administrator.
    #[arg(long)]
    pub admin: bool,

    /// Id the uploaded emoji received; records the import in the registry.
    #[arg(long, requires = "author")]
    pub emoji_id: Option<EmojiId>,
}

impl ImportArgs {
    /// Returns the caller identity when a guild member was given.
    #[must_use]
    pub fn caller(&self) -> Option<(GuildId, Caller)> {
        let guild = self.guild?;
        let author = self.author?;
        Some((guild, caller(author, &self.roles, self.admin, false)))
    }
}

/// Target of a permission override.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct TargetArgs {
    /// Role to allow or remove.
    #[arg(long)]
    pub role: Option<RoleId>,

    /// User to allow or remove.
    #[arg(long)]
    pub user: Option<UserId>,
}

impl TargetArgs {
    /// Converts into a permission target.
    #[must_use]
    pub fn target(&self) -> Option<PermissionTarget> {
        match (self.role, self.user) {
            (Some(role), _) => Some(PermissionTarget::Role(role)),
            (None, Some(user)) => Some(PermissionTarget::user(user)),
            (None, None) => None,
        }
    }
}

/// `permissions` subcommands.
#[derive(Debug, Subcommand)]
pub enum PermissionsCommand {
    /// Allow a role or user to use a command.
    Allow {
        /// Guild id.
        #[arg(long)]
        guild: GuildId,
        /// Qualified command name, e.g. `7tv emote add`.
        #[arg(long)]
        command: String,
        /// Role or user.
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Remove a role or user from a command's allow-list.
    Remove {
        /// Guild id.
        #[arg(long)]
        guild: GuildId,
        /// Qualified command name.
        #[arg(long)]
        command: String,
        /// Role or user.
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Show the allow-lists of a command.
    List {
        /// Guild id.
        #[arg(long)]
        guild: GuildId,
        /// Qualified command name.
        #[arg(long)]
        command: String,
    },

    /// Evaluate whether a member may use a command.
    Check {
        /// Guild id.
        #[arg(long)]
        guild: GuildId,
        /// Qualified command name.
        #[arg(long)]
        command: String,
        /// Member id.
        #[arg(long)]
        user: UserId,
        /// Roles held by the member.
        #[arg(long = "role")]
        roles: Vec<RoleId>,
        /// The member is a guild administrator.
        #[arg(long)]
        admin: bool,
    },
}

/// `emotes` subcommands.
#[derive(Debug, Subcommand)]
pub enum EmotesCommand {
    /// List imported emotes.
    List {
        /// Guild id.
        #[arg(long)]
        guild: GuildId,
        /// Only emotes imported by this member.
        #[arg(long)]
        author: Option<UserId>,
    },

    /// Remove an emote record.
    Forget {
        /// Guild id.
        #[arg(long)]
        guild: GuildId,
        /// Emoji id.
        #[arg(long)]
        emoji_id: EmojiId,
        /// Member asking for the removal.
        #[arg(long)]
        user: UserId,
        /// The member is a guild administrator.
        #[arg(long)]
        admin: bool,
        /// The member can manage emojis.
        #[arg(long)]
        manage_emojis: bool,
    },

    /// Drop records of emojis that no longer exist in the guild.
    Prune {
        /// Guild id.
        #[arg(long)]
        guild: GuildId,
        /// Emoji ids still present in the guild.
        #[arg(long = "present", value_delimiter = ',')]
        present: Vec<EmojiId>,
    },
}

/// Builds a caller from command line flags.
#[must_use]
pub fn caller(user: UserId, roles: &[RoleId], admin: bool, manage_emojis: bool) -> Caller {
    let mut permissions = Permissions::empty();
    permissions.set(Permissions::ADMINISTRATOR, admin);
    permissions.set(Permissions::MANAGE_EMOJIS_AND_STICKERS, manage_emojis);

    Caller::new(user)
        .with_roles(roles.iter().copied())
        .with_permissions(permissions)
}
