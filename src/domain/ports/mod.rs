mod emote_source_port;
mod emote_transcoder_port;
mod guild_store_port;

pub use emote_source_port::EmoteSourcePort;
pub use emote_transcoder_port::EmoteTranscoderPort;
pub use guild_store_port::GuildStorePort;
