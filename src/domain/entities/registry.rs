//! Registry of emotes imported into a guild.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{EmojiId, UserId};
use crate::domain::errors::RegistryError;

/// Link between a guild emoji and the remote emote it was imported from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmoteRegistryRecord {
    /// Guild emoji id.
    pub emoji_id: EmojiId,
    /// Remote emote id.
    pub source_id: String,
    /// Member who imported the emote.
    pub author_id: UserId,
    /// Whether the emoji is animated.
    pub animated: bool,
}

/// Imported emotes of one guild, keyed by emoji id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmoteRegistry {
    records: BTreeMap<EmojiId, EmoteRegistryRecord>,
}

impl EmoteRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record.
    ///
    /// # Errors
    /// Returns [`RegistryError::DuplicateRecord`] if the emoji id is already registered.
    pub fn insert(&mut self, record: EmoteRegistryRecord) -> Result<(), RegistryError> {
        if self.records.contains_key(&record.emoji_id) {
            return Err(RegistryError::DuplicateRecord {
                emoji_id: record.emoji_id,
            });
        }
        self.records.insert(record.emoji_id, record);
        Ok(())
    }

    /// Removes a record, returning it if present.
    pub fn remove(&mut self, emoji_id: EmojiId) -> Option<EmoteRegistryRecord> {
        self.records.remove(&emoji_id)
    }

    /// Looks up a record by emoji id.
    #[must_use]
    pub fn get(&self, emoji_id: EmojiId) -> Option<&EmoteRegistryRecord> {
        self.records.get(&emoji_id)
    }

    /// Returns the emoji ids imported by an author.
    #[must_use]
    pub fn by_author(&self, author: UserId) -> Vec<EmojiId> {
        self.records
            .values()
            .filter(|r| r.author_id == author)
            .map(|r| r.emoji_id)
            .collect()
    }

    /// Drops records whose emoji is not in `present`. Returns the removed ids.
    pub fn retain_present(&mut self, present: &HashSet<EmojiId>) -> Vec<EmojiId> {
        let stale: Vec<EmojiId> = self
            .records
            .keys()
            .filter(|id| !present.contains(id))
            .copied()
            .collect();

        for id in &stale {
            self.records.remove(id);
        }

        stale
    }

    /// Iterates over records in emoji id order.
    pub fn iter(&self) -> impl Iterator<Item = &EmoteRegistryRecord> {
        self.records.values()
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
