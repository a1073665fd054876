//! Application layer with use cases and DTOs.

/// Data transfer objects.
pub mod dto;
/// Per-guild locking.
pub mod guild_locks;
/// Use case implementations.
pub mod use_cases;

pub use dto::{ImportEmoteRequest, ImportEmoteResponse};
pub use guild_locks::GuildLocks;
pub use use_cases::{EmoteRegistryUseCase, ImportEmoteUseCase, ManagePermissionsUseCase};
