//! Emote image transcoding.
//!
//! This module provides:
//! - Decoding of static and animated sources into RGBA frames
//! - PNG and GIF encoders
//! - The size-fitting transcoder behind [`EmoteTranscoderPort`](crate::domain::ports::EmoteTranscoderPort)

pub mod decode;
pub mod encode;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod transcoder;

pub use transcoder::{
    AnimatedAttempt, DEFAULT_MAX_STRIDE, DEFAULT_SIZE_LIMIT, ImageTranscoder, TranscoderConfig,
};
