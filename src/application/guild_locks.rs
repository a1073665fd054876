//! Per-guild serialization of read-modify-write cycles.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::OwnedMutexGuard;

use crate::domain::entities::GuildId;

/// Hands out one async lock per guild.
///
/// Holding the guard across load, mutate and save keeps concurrent edits of
/// the same guild record from overwriting each other.
#[derive(Debug, Default)]
pub struct GuildLocks {
    locks: Mutex<HashMap<GuildId, Arc<tokio::sync::Mutex<()>>>>,
}

impl GuildLocks {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to a guild record.
    ///
    /// Locks nobody holds or waits on are dropped from the table on each call.
    pub async fn lock(&self, guild_id: GuildId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock();
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(guild_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks.lock().len()
    }
}
