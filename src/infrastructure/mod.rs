//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Emote image transcoding.
pub mod image;
/// 7TV API client.
pub mod seventv;
/// Guild settings storage adapters.
pub mod storage;

pub use config::{AppConfig, CliArgs, LogLevel, StorageManager};
pub use image::{ImageTranscoder, TranscoderConfig};
pub use seventv::SevenTvClient;
pub use storage::JsonGuildStore;
