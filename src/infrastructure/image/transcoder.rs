//! Fits decoded emotes into the emoji size budget.

use bytes::Bytes;
use gif::DisposalMethod;
use image::DynamicImage;
use tracing::{debug, warn};

use super::decode::{DecodedSource, SourceFrame, decode};
use super::encode::{GifOptions, encode_gif, encode_png, has_transparency};
use crate::domain::entities::TranscodedImage;
use crate::domain::errors::EmoteError;
use crate::domain::ports::EmoteTranscoderPort;

/// Discord custom emoji upload limit.
pub const DEFAULT_SIZE_LIMIT: u64 = 262_144;

/// Largest frame-keep interval tried before giving up.
pub const DEFAULT_MAX_STRIDE: usize = 4;

/// Configuration for the transcoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscoderConfig {
    /// Byte budget for encoded output.
    pub size_limit: u64,
    /// Largest stride the frame-skip loop tries, capped at [`DEFAULT_MAX_STRIDE`].
    pub max_stride: usize,
    /// Keep original frame delays when skipping frames, so the animation plays faster.
    pub speed_up: bool,
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            size_limit: DEFAULT_SIZE_LIMIT,
            max_stride: DEFAULT_MAX_STRIDE,
            speed_up: false,
        }
    }
}

/// Best animated encoding found by the frame-skip loop.
#[derive(Debug, Clone)]
pub struct AnimatedAttempt {
    /// Encoded GIF bytes.
    pub bytes: Vec<u8>,
    /// Stride that produced the bytes.
    pub stride: usize,
    /// Frames kept at that stride.
    pub frame_count: usize,
}

/// Decodes, squares and re-encodes emotes using `image` and `gif`.
#[derive(Debug, Clone, Default)]
pub struct ImageTranscoder {
    config: TranscoderConfig,
}

impl ImageTranscoder {
    /// Creates a transcoder.
    #[must_use]
    pub const fn new(config: TranscoderConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &TranscoderConfig {
        &self.config
    }

    /// Encodes a static image as PNG, center-cropped to a square when asked.
    ///
    /// No further shrinking is attempted; the caller checks the budget.
    ///
    /// # Errors
    /// Returns [`EmoteError::Encode`] if PNG encoding fails.
    pub fn encode_static(
        &self,
        image: &DynamicImage,
        square_fit: bool,
    ) -> Result<(Vec<u8>, u32, u32), EmoteError> {
        let image = if square_fit {
            let (x, y, side) = square_region(image.width(), image.height());
            image.crop_imm(x, y, side, side)
        } else {
            image.clone()
        };

        let bytes = encode_png(&image)?;
        Ok((bytes, image.width(), image.height()))
    }

    /// Runs the frame-skip loop over an animation.
    ///
    /// Returns the first attempt within budget, or the last attempt (at the
    /// maximum stride) when none fits. Frames must share one canvas size.
    ///
    /// # Errors
    /// Returns [`EmoteError::Encode`] if GIF encoding fails.
    pub fn encode_animated(&self, frames: &[SourceFrame]) -> Result<AnimatedAttempt, EmoteError> {
        let dispose = if has_transparency(frames) {
            DisposalMethod::Background
        } else {
            DisposalMethod::Keep
        };
        let max_stride = self.config.max_stride.clamp(1, DEFAULT_MAX_STRIDE);

        let mut stride = 1;
        loop {
            let options = GifOptions {
                stride,
                scale_delay: !self.config.speed_up,
                dispose,
            };
            let bytes = encode_gif(frames, options)?;
            let frame_count = frames.len().div_ceil(stride);

            debug!(
                stride,
                frames = frame_count,
                size = bytes.len(),
                budget = self.config.size_limit,
                "Encoded animation attempt"
            );

            if fits(&bytes, self.config.size_limit) || stride >= max_stride {
                return Ok(AnimatedAttempt {
                    bytes,
                    stride,
                    frame_count,
                });
            }

            stride += 1;
        }
    }

    fn check_budget(&self, bytes: &[u8]) -> Result<(), EmoteError> {
        if fits(bytes, self.config.size_limit) {
            return Ok(());
        }

        warn!(
            size = bytes.len(),
            budget = self.config.size_limit,
            "Emote exceeds size budget"
        );
        Err(EmoteError::FailedToFindFittingEmote {
            budget: self.config.size_limit,
            produced: bytes.len() as u64,
        })
    }
}

impl EmoteTranscoderPort for ImageTranscoder {
    fn size_limit(&self) -> u64 {
        self.config.size_limit
    }

    fn transcode(&self, bytes: &[u8], square_fit: bool) -> Result<TranscodedImage, EmoteError> {
        match decode(bytes)? {
            DecodedSource::Static(image) => {
                let (encoded, width, height) = self.encode_static(&image, square_fit)?;
                self.check_budget(&encoded)?;

                Ok(TranscodedImage {
                    bytes: Bytes::from(encoded),
                    width,
                    height,
                    animated: false,
                    frame_count: 1,
                    stride: 1,
                })
            }
            DecodedSource::Animated(mut frames) => {
                if square_fit {
                    square_frames(&mut frames);
                }
                let (width, height) = frames
                    .first()
                    .map_or((0, 0), |f| f.image.dimensions());

                let attempt = self.encode_animated(&frames)?;
                self.check_budget(&attempt.bytes)?;

                Ok(TranscodedImage {
                    bytes: Bytes::from(attempt.bytes),
                    width,
                    height,
                    animated: true,
                    frame_count: attempt.frame_count,
                    stride: attempt.stride,
                })
            }
        }
    }
}

fn fits(bytes: &[u8], size_limit: u64) -> bool {
    bytes.len() as u64 <= size_limit
}

/// Centered square of side `min(width, height)`, as `(x, y, side)`.
fn square_region(width: u32, height: u32) -> (u32, u32, u32) {
    let side = width.min(height);
    ((width - side) / 2, (height - side) / 2, side)
}

fn square_frames(frames: &mut [SourceFrame]) {
    for frame in frames {
        let (x, y, side) = square_region(frame.image.width(), frame.image.height());
        frame.image = image::imageops::crop_imm(&frame.image, x, y, side, side).to_image();
    }
}
