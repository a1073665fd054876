//! Synthetic images for tests.

use std::io::Cursor;

use gif::{DisposalMethod, Encoder, Frame, Repeat};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

/// Deterministic xorshift noise, so encoded sizes are stable between runs.
struct Noise(u32);

impl Noise {
    fn next(&mut self) -> u8 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        (x >> 24) as u8
    }
}

/// Smooth PNG that compresses well.
pub fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128, 255])
    });
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

/// Noise PNG that barely compresses.
pub fn noise_png(width: u32, height: u32) -> Vec<u8> {
    let mut noise = Noise(0x9E37_79B9);
    let img = RgbaImage::from_fn(width, height, |_, _| {
        Rgba([noise.next(), noise.next(), noise.next(), 255])
    });
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

/// Animated GIF of independent noise frames.
///
/// With `transparent` set, the top row of every frame is fully transparent.
pub fn noise_gif(width: u16, height: u16, frames: usize, delay_cs: u16, transparent: bool) -> Vec<u8> {
    let mut noise = Noise(0x2545_F491);
    let mut buf = Vec::new();
    {
        let mut encoder = Encoder::new(&mut buf, width, height, &[]).unwrap();
        encoder.set_repeat(Repeat::Infinite).unwrap();

        for _ in 0..frames {
            let mut pixels = Vec::with_capacity(usize::from(width) * usize::from(height) * 4);
            for y in 0..height {
                for _ in 0..width {
                    let alpha = if transparent && y == 0 { 0 } else { 255 };
                    pixels.extend_from_slice(&[noise.next(), noise.next(), noise.next(), alpha]);
                }
            }
            let mut frame = Frame::from_rgba_speed(width, height, &mut pixels, 10);
            frame.delay = delay_cs;
            frame.dispose = DisposalMethod::Background;
            encoder.write_frame(&frame).unwrap();
        }
    }
    buf
}

/// Animated PNG of independent opaque noise frames.
pub fn noise_apng(width: u32, height: u32, frames: u32, delay_ms: u16) -> Vec<u8> {
    let mut noise = Noise(0x1B87_3593);
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_animated(frames, 0).unwrap();
        encoder.set_frame_delay(delay_ms, 1000).unwrap();

        let mut writer = encoder.write_header().unwrap();
        for _ in 0..frames {
            let pixels: Vec<u8> = (0..width * height)
                .flat_map(|_| [noise.next(), noise.next(), noise.next(), 255])
                .collect();
            writer.write_image_data(&pixels).unwrap();
        }
        writer.finish().unwrap();
    }
    buf
}
