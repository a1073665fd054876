//! PNG and GIF encoding.

use std::io::Cursor;

use gif::{DisposalMethod, Encoder, Frame, Repeat};
use image::{DynamicImage, ImageFormat};

use super::decode::SourceFrame;
use crate::domain::errors::EmoteError;

/// `NeuQuant` sampling factor, 1 (best) to 30 (fastest).
const QUANTIZE_SPEED: i32 = 10;

/// Encodes a single image as PNG.
///
/// # Errors
/// Returns [`EmoteError::Encode`] if encoding fails.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, EmoteError> {
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| EmoteError::encode(format!("png: {e}")))?;
    Ok(buf)
}

/// Options for one animated encoding attempt.
#[derive(Debug, Clone, Copy)]
pub struct GifOptions {
    /// Keep every `stride`-th frame, starting with the first.
    pub stride: usize,
    /// Multiply kept frame delays by the stride.
    pub scale_delay: bool,
    /// Disposal applied to every frame.
    pub dispose: DisposalMethod,
}

/// Encodes frames as a looping GIF.
///
/// # Errors
/// Returns [`EmoteError::Encode`] if there are no frames, the canvas does not
/// fit GIF dimensions, or the encoder fails.
pub fn encode_gif(frames: &[SourceFrame], options: GifOptions) -> Result<Vec<u8>, EmoteError> {
    let first = frames
        .first()
        .ok_or_else(|| EmoteError::encode("gif: no frames to encode"))?;
    let (width, height) = first.image.dimensions();
    let width = u16::try_from(width).map_err(|_| EmoteError::encode("gif: canvas too wide"))?;
    let height = u16::try_from(height).map_err(|_| EmoteError::encode("gif: canvas too tall"))?;

    let stride = options.stride.max(1);
    let delay_factor = if options.scale_delay { stride } else { 1 };

    let mut buf = Vec::new();
    {
        let mut encoder = Encoder::new(&mut buf, width, height, &[]).map_err(gif_err)?;
        encoder.set_repeat(Repeat::Infinite).map_err(gif_err)?;

        for source in frames.iter().step_by(stride) {
            let mut pixels = source.image.as_raw().clone();
            let mut frame = Frame::from_rgba_speed(width, height, &mut pixels, QUANTIZE_SPEED);
            frame.delay = delay_centis(source.delay_ms, delay_factor);
            frame.dispose = options.dispose;
            encoder.write_frame(&frame).map_err(gif_err)?;
        }
    }

    Ok(buf)
}

/// Converts a millisecond delay into GIF centiseconds, scaled by `factor`.
#[must_use]
pub fn delay_centis(delay_ms: u32, factor: usize) -> u16 {
    let centis = u64::from(delay_ms.saturating_add(5) / 10);
    let scaled = centis.saturating_mul(u64::try_from(factor).unwrap_or(u64::MAX));
    u16::try_from(scaled).unwrap_or(u16::MAX)
}

/// Returns whether any frame has a pixel that is not fully opaque.
#[must_use]
pub fn has_transparency(frames: &[SourceFrame]) -> bool {
    frames
        .iter()
        .any(|f| f.image.pixels().any(|p| p.0[3] < u8::MAX))
}

fn gif_err(e: gif::EncodingError) -> EmoteError {
    EmoteError::encode(format!("gif: {e}"))
}
