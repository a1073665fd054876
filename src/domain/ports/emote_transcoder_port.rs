//! Transcoder port definition.

use crate::domain::entities::TranscodedImage;
use crate::domain::errors::EmoteError;

/// Port for fitting raw image bytes into the emoji size budget.
///
/// Calls are CPU bound and blocking.
#[cfg_attr(test, mockall::automock)]
pub trait EmoteTranscoderPort: Send + Sync {
    /// Byte budget every successful output stays within.
    fn size_limit(&self) -> u64;

    /// Decodes, optionally squares, and re-encodes an image.
    ///
    /// # Errors
    /// Returns [`EmoteError::DecodeFailed`] for unreadable input and
    /// [`EmoteError::FailedToFindFittingEmote`] when the output cannot be
    /// brought under [`Self::size_limit`].
    fn transcode(&self, bytes: &[u8], square_fit: bool) -> Result<TranscodedImage, EmoteError>;
}
