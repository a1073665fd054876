//! Pure domain services.

mod emoji_name;
mod permission_resolver;
mod variant_selector;

pub use emoji_name::{extract_emote_id, to_emoji_name, truncate_name};
pub use permission_resolver::{PermissionPolicy, PermissionResolver, Resolution};
pub use variant_selector::{MAX_TIER, select_variant, tier_file_name};
