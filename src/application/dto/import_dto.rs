//! Emote import DTOs.

use crate::domain::entities::EncodedEmote;

/// Emote import request data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEmoteRequest {
    /// 7TV emote URL or bare emote id.
    pub emote: String,
    /// Crop the emote to a square.
    pub square_fit: bool,
    /// Name to upload the emoji under instead of the remote name.
    pub custom_name: Option<String>,
}

impl ImportEmoteRequest {
    /// Creates new import request.
    #[must_use]
    pub fn new(emote: impl Into<String>) -> Self {
        Self {
            emote: emote.into(),
            square_fit: false,
            custom_name: None,
        }
    }

    /// Enables square fitting.
    #[must_use]
    pub const fn square(mut self, square_fit: bool) -> Self {
        self.square_fit = square_fit;
        self
    }

    /// Sets a custom emoji name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.custom_name = Some(name.into());
        self
    }
}

/// Emote import response data.
#[derive(Debug, Clone)]
pub struct ImportEmoteResponse {
    /// The encoded emote.
    pub emote: EncodedEmote,
    /// Sanitized name to create the emoji under.
    pub emoji_name: String,
    /// Whether the name came from the request rather than the remote source.
    pub uses_custom_name: bool,
}
