//! Emote manifest and the artifacts produced from it.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Maximum length of an emoji name accepted by Discord.
pub const MAX_EMOTE_NAME_LEN: usize = 32;

/// One encoded file offered by the remote source for an emote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmoteVariant {
    /// File name on the host, e.g. `4x.gif`.
    pub file_name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Size declared by the remote source, in bytes.
    pub size_bytes: u64,
}

impl EmoteVariant {
    /// Creates a variant description.
    #[must_use]
    pub fn new(file_name: impl Into<String>, width: u32, height: u32, size_bytes: u64) -> Self {
        Self {
            file_name: file_name.into(),
            width,
            height,
            size_bytes,
        }
    }
}

/// Remote metadata for a single emote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmoteManifest {
    /// Remote emote id.
    pub id: String,
    /// Display name as reported by the remote source.
    pub name: String,
    /// Whether the remote source flags the emote as animated.
    pub animated: bool,
    /// Protocol-relative host URL the variant files live under.
    pub host_url: String,
    /// Variants in the order supplied by the remote source.
    pub variants: Vec<EmoteVariant>,
}

impl EmoteManifest {
    /// Builds the absolute download URL of a variant hosted for this emote.
    #[must_use]
    pub fn download_url(&self, variant: &EmoteVariant) -> String {
        let host = self.host_url.trim_end_matches('/');
        if host.starts_with("//") {
            format!("https:{host}/{}", variant.file_name)
        } else {
            format!("{host}/{}", variant.file_name)
        }
    }
}

/// Variant chosen for download, with its computed location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FittingResult {
    /// The chosen remote variant.
    pub variant: EmoteVariant,
    /// Declared width of the variant.
    pub width: u32,
    /// Declared height of the variant.
    pub height: u32,
    /// Absolute URL to fetch the variant bytes from.
    pub download_url: String,
}

/// Container format of an encoded emote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmoteFormat {
    /// Single-frame PNG.
    Png,
    /// Animated GIF.
    Gif,
}

impl EmoteFormat {
    /// Returns the format matching the animated flag.
    #[must_use]
    pub const fn for_animated(animated: bool) -> Self {
        if animated { Self::Gif } else { Self::Png }
    }

    /// Returns the file extension for the format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Gif => "gif",
        }
    }
}

impl std::fmt::Display for EmoteFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Output of the transcoder for one emote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodedImage {
    /// Encoded bytes.
    pub bytes: Bytes,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Whether the output is a multi-frame animation.
    pub animated: bool,
    /// Number of frames written.
    pub frame_count: usize,
    /// Frame-keep interval used to reach the budget (1 for static images).
    pub stride: usize,
}

/// Finished emote, ready to be uploaded as a custom emoji.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedEmote {
    /// Remote emote id.
    pub source_id: String,
    /// Emote name, at most [`MAX_EMOTE_NAME_LEN`] characters.
    pub name: String,
    /// Encoded container format.
    pub format: EmoteFormat,
    /// Whether the emote is animated.
    pub animated: bool,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// URL of the variant the bytes were produced from.
    pub source_url: String,
    /// Encoded image bytes.
    pub bytes: Bytes,
}

impl std::fmt::Debug for EncodedEmote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedEmote")
            .field("source_id", &self.source_id)
            .field("name", &self.name)
            .field("format", &self.format)
            .field("animated", &self.animated)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("source_url", &self.source_url)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}
