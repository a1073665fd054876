//! Decoding of static and animated source images into RGBA frames.

use std::io::Cursor;

use image::codecs::gif::GifDecoder;
use image::codecs::png::PngDecoder;
use image::codecs::webp::WebPDecoder;
use image::{AnimationDecoder, DynamicImage, Frames, ImageFormat, RgbaImage};

use crate::domain::errors::EmoteError;

/// One fully composited animation frame.
#[derive(Debug, Clone)]
pub struct SourceFrame {
    /// Frame pixels, covering the whole canvas.
    pub image: RgbaImage,
    /// Display duration in milliseconds.
    pub delay_ms: u32,
}

/// Decoded source image.
#[derive(Debug)]
pub enum DecodedSource {
    /// A single image.
    Static(DynamicImage),
    /// Two or more frames.
    Animated(Vec<SourceFrame>),
}

/// Decodes raw bytes, detecting animation by frame count.
///
/// # Errors
/// Returns [`EmoteError::DecodeFailed`] if the bytes are not a supported image.
pub fn decode(bytes: &[u8]) -> Result<DecodedSource, EmoteError> {
    let format = image::guess_format(bytes).map_err(|e| EmoteError::decode(e.to_string()))?;

    let frames = match format {
        ImageFormat::Gif => {
            let decoder = GifDecoder::new(Cursor::new(bytes)).map_err(decode_err)?;
            collect(decoder.into_frames())?
        }
        ImageFormat::Png => {
            let decoder = PngDecoder::new(Cursor::new(bytes)).map_err(decode_err)?;
            if decoder.is_apng().map_err(decode_err)? {
                collect(decoder.apng().map_err(decode_err)?.into_frames())?
            } else {
                return load_static(bytes, format);
            }
        }
        ImageFormat::WebP => {
            let decoder = WebPDecoder::new(Cursor::new(bytes)).map_err(decode_err)?;
            if decoder.has_animation() {
                collect(decoder.into_frames())?
            } else {
                return load_static(bytes, format);
            }
        }
        other => return load_static(bytes, other),
    };

    into_source(frames)
}

fn load_static(bytes: &[u8], format: ImageFormat) -> Result<DecodedSource, EmoteError> {
    image::load_from_memory_with_format(bytes, format)
        .map(DecodedSource::Static)
        .map_err(decode_err)
}

fn collect(frames: Frames<'_>) -> Result<Vec<SourceFrame>, EmoteError> {
    frames
        .collect_frames()
        .map_err(decode_err)?
        .into_iter()
        .map(|frame| {
            let (numer, denom) = frame.delay().numer_denom_ms();
            let delay_ms = if denom == 0 {
                0
            } else {
                (numer + denom / 2) / denom
            };
            Ok(SourceFrame {
                image: frame.into_buffer(),
                delay_ms,
            })
        })
        .collect()
}

fn into_source(mut frames: Vec<SourceFrame>) -> Result<DecodedSource, EmoteError> {
    match frames.len() {
        0 => Err(EmoteError::decode("image contains no frames")),
        1 => {
            let frame = frames.remove(0);
            Ok(DecodedSource::Static(DynamicImage::ImageRgba8(frame.image)))
        }
        _ => Ok(DecodedSource::Animated(frames)),
    }
}

#[allow(clippy::needless_pass_by_value)]
fn decode_err(e: image::ImageError) -> EmoteError {
    EmoteError::decode(e.to_string())
}
