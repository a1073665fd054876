//! Domain entities.

mod emote;
mod guild_settings;
mod ids;
mod permission;
mod registry;

pub use emote::{
    EmoteFormat, EmoteManifest, EmoteVariant, EncodedEmote, FittingResult, MAX_EMOTE_NAME_LEN,
    TranscodedImage,
};
pub use guild_settings::GuildSettings;
pub use ids::{EmojiId, GuildId, RoleId, UserId};
pub use permission::{
    Caller, CommandOverride, PermissionOverrideTable, PermissionTarget, Permissions,
};
pub use registry::{EmoteRegistry, EmoteRegistryRecord};
