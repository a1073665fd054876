//! File-backed guild settings store.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::entities::{GuildId, GuildSettings};
use crate::domain::errors::StoreError;
use crate::domain::ports::GuildStorePort;

/// Stores each guild as `<dir>/<guild_id>.json`.
#[derive(Debug, Clone)]
pub struct JsonGuildStore {
    dir: PathBuf,
}

impl JsonGuildStore {
    /// Creates a store rooted at `dir`. The directory is created on first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, guild_id: GuildId) -> PathBuf {
        self.dir.join(format!("{guild_id}.json"))
    }
}

fn write_atomic(dir: &Path, path: &Path, content: &[u8]) -> Result<(), StoreError> {
    std::fs::create_dir_all(dir)?;
    let mut temp_file = tempfile::NamedTempFile::new_in(dir)?;
    temp_file.write_all(content)?;
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl GuildStorePort for JsonGuildStore {
    async fn get(&self, guild_id: GuildId) -> Result<Option<GuildSettings>, StoreError> {
        let path = self.path_for(guild_id);

        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&content)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                path: path.display().to_string(),
                source,
            })
    }

    async fn save(&self, settings: &GuildSettings) -> Result<(), StoreError> {
        let content = serde_json::to_vec_pretty(settings).map_err(StoreError::Serialize)?;
        let dir = self.dir.clone();
        let path = self.path_for(settings.guild_id);

        debug!(guild_id = %settings.guild_id, path = %path.display(), "Saving guild record");

        tokio::task::spawn_blocking(move || write_atomic(&dir, &path, &content))
            .await
            .map_err(|e| StoreError::Io(std::io::Error::other(e)))?
    }

    async fn delete(&self, guild_id: GuildId) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.path_for(guild_id)).await {
            Ok(()) => {
                info!(guild_id = %guild_id, "Deleted guild record");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
