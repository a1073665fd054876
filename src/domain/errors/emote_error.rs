//! Emote import error types.

use thiserror::Error;

/// Errors raised while fetching, selecting or transcoding an emote.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum EmoteError {
    #[error("emote `{emote_id}` not found")]
    NotFound { emote_id: String },

    #[error("network error: {message}")]
    Transport { message: String },

    #[error("failed to read JSON for emote `{emote_id}`: {message}")]
    ManifestMalformed { emote_id: String, message: String },

    #[error("failed reading bytes from {url}: {message}")]
    DownloadFailed { url: String, message: String },

    #[error("emote `{emote_id}` has no variant within {budget} bytes")]
    NoFittingVariant { emote_id: String, budget: u64 },

    #[error("failed to decode image: {message}")]
    DecodeFailed { message: String },

    #[error("encoded emote is {produced} bytes, over the {budget} byte limit")]
    FailedToFindFittingEmote { budget: u64, produced: u64 },

    #[error("failed to encode image: {message}")]
    Encode { message: String },
}

impl EmoteError {
    /// Creates not found error.
    #[must_use]
    pub fn not_found(emote_id: impl Into<String>) -> Self {
        Self::NotFound {
            emote_id: emote_id.into(),
        }
    }

    /// Creates transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates malformed manifest error.
    #[must_use]
    pub fn malformed(emote_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ManifestMalformed {
            emote_id: emote_id.into(),
            message: message.into(),
        }
    }

    /// Creates download failed error.
    #[must_use]
    pub fn download_failed(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DownloadFailed {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::DecodeFailed {
            message: message.into(),
        }
    }

    /// Creates encode error.
    #[must_use]
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }

    /// Returns whether the failure happened on the network.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::DownloadFailed { .. })
    }

    /// Returns whether the emote could not be brought under the size budget.
    #[must_use]
    pub const fn is_size_violation(&self) -> bool {
        matches!(
            self,
            Self::NoFittingVariant { .. } | Self::FailedToFindFittingEmote { .. }
        )
    }

    /// Returns a short message suitable for showing to the invoking user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { emote_id } => format!("Emote `{emote_id}` was not found."),
            Self::NoFittingVariant { budget, .. } | Self::FailedToFindFittingEmote { budget, .. } => {
                format!(
                    "This emote cannot be made smaller than {} KiB.",
                    budget / 1024
                )
            }
            Self::Transport { .. } | Self::DownloadFailed { .. } => {
                "Could not reach the emote host, try again later.".to_string()
            }
            other => format!("Unexpected error: {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(EmoteError::transport("timeout").is_network_error());
        assert!(EmoteError::download_failed("u", "HTTP 500").is_network_error());
        assert!(!EmoteError::not_found("x").is_network_error());

        let err = EmoteError::FailedToFindFittingEmote {
            budget: 262_144,
            produced: 300_000,
        };
        assert!(err.is_size_violation());
        assert_eq!(
            err.user_message(),
            "This emote cannot be made smaller than 256 KiB."
        );
    }

    #[test]
    fn test_display_carries_context() {
        let err = EmoteError::NoFittingVariant {
            emote_id: "abc".to_string(),
            budget: 262_144,
        };
        assert_eq!(
            err.to_string(),
            "emote `abc` has no variant within 262144 bytes"
        );
    }
}
