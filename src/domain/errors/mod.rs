//! Domain error types.

mod emote_error;
mod permission_error;
mod registry_error;
mod store_error;

pub use emote_error::EmoteError;
pub use permission_error::PermissionError;
pub use registry_error::RegistryError;
pub use store_error::StoreError;
