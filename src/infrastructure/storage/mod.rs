//! Guild settings storage adapters.

mod json_guild_store;

pub use json_guild_store::JsonGuildStore;
