//! Use case implementations.

mod emote_registry_use_case;
mod import_emote_use_case;
mod manage_permissions_use_case;

pub use emote_registry_use_case::EmoteRegistryUseCase;
pub use import_emote_use_case::ImportEmoteUseCase;
pub use manage_permissions_use_case::ManagePermissionsUseCase;
