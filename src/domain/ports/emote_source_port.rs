//! Remote emote source port definition.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::entities::EmoteManifest;
use crate::domain::errors::EmoteError;

/// Port for retrieving emote metadata and files from a remote host.
///
/// Implementations never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmoteSourcePort: Send + Sync {
    /// Fetches the manifest of an emote.
    async fn fetch_manifest(&self, emote_id: &str) -> Result<EmoteManifest, EmoteError>;

    /// Downloads the raw bytes of a variant file.
    async fn fetch_bytes(&self, url: &str) -> Result<Bytes, EmoteError>;
}
