//! Guild settings persistence port definition.

use async_trait::async_trait;

use crate::domain::entities::{GuildId, GuildSettings};
use crate::domain::errors::StoreError;

/// Port for loading and saving per-guild records.
#[async_trait]
pub trait GuildStorePort: Send + Sync {
    /// Loads a guild record if one exists.
    async fn get(&self, guild_id: GuildId) -> Result<Option<GuildSettings>, StoreError>;

    /// Persists a guild record, replacing any previous one.
    async fn save(&self, settings: &GuildSettings) -> Result<(), StoreError>;

    /// Deletes a guild record. Missing records are not an error.
    async fn delete(&self, guild_id: GuildId) -> Result<(), StoreError>;

    /// Loads a guild record, returning a fresh one if none exists.
    ///
    /// The flag is `true` when the record was created by this call.
    async fn get_or_create(&self, guild_id: GuildId) -> Result<(GuildSettings, bool), StoreError> {
        match self.get(guild_id).await? {
            Some(settings) => Ok((settings, false)),
            None => {
                let settings = GuildSettings::new(guild_id);
                self.save(&settings).await?;
                Ok((settings, true))
            }
        }
    }
}
