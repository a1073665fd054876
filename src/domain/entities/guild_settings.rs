//! Per-guild persisted settings.

use serde::{Deserialize, Serialize};

use super::{EmoteRegistry, GuildId, PermissionOverrideTable};

/// Everything stored for one guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSettings {
    /// Guild the record belongs to.
    pub guild_id: GuildId,
    /// Command permission overrides.
    #[serde(default)]
    pub permissions: PermissionOverrideTable,
    /// Emotes imported into the guild.
    #[serde(default)]
    pub emotes: EmoteRegistry,
}

impl GuildSettings {
    /// Creates an empty record for a guild.
    #[must_use]
    pub fn new(guild_id: GuildId) -> Self {
        Self {
            guild_id,
            permissions: PermissionOverrideTable::new(),
            emotes: EmoteRegistry::new(),
        }
    }
}
