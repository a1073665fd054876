//! Bookkeeping of emotes imported into guilds.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::application::GuildLocks;
use crate::domain::entities::{
    Caller, EmojiId, EmoteRegistryRecord, EncodedEmote, GuildId, Permissions, UserId,
};
use crate::domain::errors::RegistryError;
use crate::domain::ports::GuildStorePort;

/// Records which member imported which emoji, and prunes stale records.
#[derive(Clone)]
pub struct EmoteRegistryUseCase {
    store: Arc<dyn GuildStorePort>,
    locks: Arc<GuildLocks>,
}

impl EmoteRegistryUseCase {
    /// Creates new registry use case.
    #[must_use]
    pub const fn new(store: Arc<dyn GuildStorePort>, locks: Arc<GuildLocks>) -> Self {
        Self { store, locks }
    }

    /// Records an uploaded emote under its emoji id.
    ///
    /// # Errors
    /// Returns [`RegistryError::DuplicateRecord`] if the emoji id is taken.
    pub async fn register_emote(
        &self,
        guild_id: GuildId,
        author_id: UserId,
        emote: &EncodedEmote,
        emoji_id: EmojiId,
    ) -> Result<EmoteRegistryRecord, RegistryError> {
        let _guard = self.locks.lock(guild_id).await;
        let (mut settings, _) = self.store.get_or_create(guild_id).await?;

        let record = EmoteRegistryRecord {
            emoji_id,
            source_id: emote.source_id.clone(),
            author_id,
            animated: emote.animated,
        };
        settings.emotes.insert(record.clone())?;
        self.store.save(&settings).await?;

        info!(
            guild_id = %guild_id,
            emoji_id = %emoji_id,
            author_id = %author_id,
            source_id = %emote.source_id,
            "Registered emote"
        );

        Ok(record)
    }

    /// Removes a record on behalf of a caller.
    ///
    /// Returns the removed record, or `None` if the emoji was never registered.
    ///
    /// # Errors
    /// Returns [`RegistryError::NotAuthor`] if the caller may not manage the emote.
    pub async fn remove_emote(
        &self,
        guild_id: GuildId,
        caller: &Caller,
        emoji_id: EmojiId,
    ) -> Result<Option<EmoteRegistryRecord>, RegistryError> {
        let _guard = self.locks.lock(guild_id).await;
        let Some(mut settings) = self.store.get(guild_id).await? else {
            return Ok(None);
        };

        let Some(record) = settings.emotes.get(emoji_id) else {
            return Ok(None);
        };
        Self::ensure_can_manage(caller, record)?;

        let removed = settings.emotes.remove(emoji_id);
        self.store.save(&settings).await?;

        info!(guild_id = %guild_id, emoji_id = %emoji_id, "Removed emote record");
        Ok(removed)
    }

    /// Checks whether a caller may remove or rename a registered emote.
    ///
    /// # Errors
    /// Returns [`RegistryError::NotAuthor`] unless the caller is an
    /// administrator, can manage emojis, or imported the emote.
    pub fn ensure_can_manage(
        caller: &Caller,
        record: &EmoteRegistryRecord,
    ) -> Result<(), RegistryError> {
        let privileged = caller
            .permissions
            .intersects(Permissions::ADMINISTRATOR | Permissions::MANAGE_EMOJIS_AND_STICKERS);

        if privileged || caller.user_id == record.author_id {
            Ok(())
        } else {
            Err(RegistryError::NotAuthor {
                emoji_id: record.emoji_id,
            })
        }
    }

    /// Returns the emoji ids imported by a member.
    ///
    /// # Errors
    /// Returns error if the guild record cannot be read.
    pub async fn emotes_by(
        &self,
        guild_id: GuildId,
        author_id: UserId,
    ) -> Result<Vec<EmojiId>, RegistryError> {
        Ok(self
            .store
            .get(guild_id)
            .await?
            .map(|s| s.emotes.by_author(author_id))
            .unwrap_or_default())
    }

    /// Looks up the record of an emoji.
    ///
    /// # Errors
    /// Returns error if the guild record cannot be read.
    pub async fn get_by_emoji_id(
        &self,
        guild_id: GuildId,
        emoji_id: EmojiId,
    ) -> Result<Option<EmoteRegistryRecord>, RegistryError> {
        Ok(self
            .store
            .get(guild_id)
            .await?
            .and_then(|s| s.emotes.get(emoji_id).cloned()))
    }

    /// Returns every record of a guild in emoji id order.
    ///
    /// # Errors
    /// Returns error if the guild record cannot be read.
    pub async fn list(&self, guild_id: GuildId) -> Result<Vec<EmoteRegistryRecord>, RegistryError> {
        Ok(self
            .store
            .get(guild_id)
            .await?
            .map(|s| s.emotes.iter().cloned().collect())
            .unwrap_or_default())
    }

    /// Drops records whose emoji is no longer in `present`.
    ///
    /// A guild seen for the first time gets an empty record and nothing is
    /// pruned. Returns the removed emoji ids.
    ///
    /// # Errors
    /// Returns error if the guild record cannot be loaded or saved.
    pub async fn unregister_deleted_emotes(
        &self,
        guild_id: GuildId,
        present: &HashSet<EmojiId>,
    ) -> Result<Vec<EmojiId>, RegistryError> {
        let _guard = self.locks.lock(guild_id).await;
        let (mut settings, created) = self.store.get_or_create(guild_id).await?;
        if created {
            debug!(guild_id = %guild_id, "New guild, nothing to prune");
            return Ok(Vec::new());
        }

        let removed = settings.emotes.retain_present(present);
        if !removed.is_empty() {
            self.store.save(&settings).await?;
            info!(guild_id = %guild_id, count = removed.len(), "Pruned deleted emotes");
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::EmoteFormat;
    use crate::domain::ports::mocks::MockGuildStore;
    use bytes::Bytes;

    const GUILD: GuildId = GuildId(1);
    const AUTHOR: UserId = UserId(10);

    fn emote(animated: bool) -> EncodedEmote {
        EncodedEmote {
            source_id: "60ae958e229664e8667aea38".to_string(),
            name: "catJAM".to_string(),
            format: EmoteFormat::for_animated(animated),
            animated,
            width: 32,
            height: 32,
            source_url: "https://cdn.7tv.app/emote/60ae958e229664e8667aea38/1x.gif".to_string(),
            bytes: Bytes::from_static(b"GIF89a"),
        }
    }

    fn use_case(store: Arc<MockGuildStore>) -> EmoteRegistryUseCase {
        EmoteRegistryUseCase::new(store, Arc::new(GuildLocks::new()))
    }

    #[tokio::test]
    async fn test_register_and_lookup() {
        let uc = use_case(Arc::new(MockGuildStore::new()));

        let record = uc
            .register_emote(GUILD, AUTHOR, &emote(true), EmojiId(100))
            .await
            .unwrap();

        assert!(record.animated);
        assert_eq!(
            uc.get_by_emoji_id(GUILD, EmojiId(100)).await.unwrap(),
            Some(record)
        );
        assert_eq!(uc.emotes_by(GUILD, AUTHOR).await.unwrap(), vec![EmojiId(100)]);
        assert!(uc.emotes_by(GUILD, UserId(11)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_emoji_id_is_rejected() {
        let uc = use_case(Arc::new(MockGuildStore::new()));
        uc.register_emote(GUILD, AUTHOR, &emote(false), EmojiId(100))
            .await
            .unwrap();

        let err = uc
            .register_emote(GUILD, UserId(11), &emote(true), EmojiId(100))
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::DuplicateRecord { .. }));
        let kept = uc.get_by_emoji_id(GUILD, EmojiId(100)).await.unwrap().unwrap();
        assert_eq!(kept.author_id, AUTHOR);
    }

    #[tokio::test]
    async fn test_remove_requires_author_or_privilege() {
        let uc = use_case(Arc::new(MockGuildStore::new()));
        uc.register_emote(GUILD, AUTHOR, &emote(false), EmojiId(100))
            .await
            .unwrap();
        uc.register_emote(GUILD, AUTHOR, &emote(false), EmojiId(101))
            .await
            .unwrap();

        let stranger = Caller::new(UserId(99));
        let err = uc
            .remove_emote(GUILD, &stranger, EmojiId(100))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotAuthor { emoji_id } if emoji_id == EmojiId(100)));

        let author = Caller::new(AUTHOR);
        assert!(uc.remove_emote(GUILD, &author, EmojiId(100)).await.unwrap().is_some());

        let moderator =
            Caller::new(UserId(98)).with_permissions(Permissions::MANAGE_EMOJIS_AND_STICKERS);
        assert!(uc.remove_emote(GUILD, &moderator, EmojiId(101)).await.unwrap().is_some());

        assert!(uc.list(GUILD).await.unwrap().is_empty());
        assert!(uc.remove_emote(GUILD, &author, EmojiId(100)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_prune_on_new_guild_does_nothing() {
        let store = Arc::new(MockGuildStore::new());
        let uc = use_case(store.clone());

        let removed = uc
            .unregister_deleted_emotes(GUILD, &HashSet::new())
            .await
            .unwrap();

        assert!(removed.is_empty());
        assert!(store.get(GUILD).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_prune_removes_missing_emojis() {
        let uc = use_case(Arc::new(MockGuildStore::new()));
        for id in [100, 101, 102] {
            uc.register_emote(GUILD, AUTHOR, &emote(false), EmojiId(id))
                .await
                .unwrap();
        }

        let present: HashSet<EmojiId> = [EmojiId(101)].into_iter().collect();
        let removed = uc.unregister_deleted_emotes(GUILD, &present).await.unwrap();

        assert_eq!(removed, vec![EmojiId(100), EmojiId(102)]);
        let left: Vec<EmojiId> = uc.list(GUILD).await.unwrap().iter().map(|r| r.emoji_id).collect();
        assert_eq!(left, vec![EmojiId(101)]);
    }
}
