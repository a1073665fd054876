//! Domain layer with core entities, errors, ports and pure services.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// Serde utilities.
pub mod serde_utils;
/// Pure domain services.
pub mod services;

pub use entities::{Caller, EncodedEmote, GuildSettings, PermissionTarget};
pub use errors::{EmoteError, PermissionError, RegistryError, StoreError};
pub use ports::{EmoteSourcePort, EmoteTranscoderPort, GuildStorePort};
pub use services::{PermissionPolicy, PermissionResolver};
