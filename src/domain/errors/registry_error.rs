//! Emote registry error types.

use thiserror::Error;

use super::StoreError;
use crate::domain::entities::EmojiId;

/// Emote registry errors.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum RegistryError {
    #[error("tried to create a record with duplicate emoji id {emoji_id}")]
    DuplicateRecord { emoji_id: EmojiId },

    #[error("emoji {emoji_id} wasn't added by you")]
    NotAuthor { emoji_id: EmojiId },

    #[error(transparent)]
    Store(#[from] StoreError),
}
