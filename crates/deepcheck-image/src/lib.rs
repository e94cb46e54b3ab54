//! Image decoding and resampling for deepcheck.
//!
//! Wraps the `image` crate. Everything leaves this crate as a `RawFrame`:
//! 8-bit, HWC (`[height, width, channels]`).

pub mod error;
pub mod frame;

pub use error::ImageError;
pub use frame::{ColorOrder, RawFrame};

use crates_image::imageops::{self, FilterType};
use crates_image::{DynamicImage, RgbImage};

/// Decodes a still image (JPEG or PNG, auto-detected) into an RGB frame.
///
/// Always produces 3 channels: grayscale is expanded, alpha is dropped,
/// 16-bit and float images are reduced to 8 bits.
///
/// # Errors
///
/// Returns `ImageError::Decode` if the data is not a readable image.
pub fn decode_image(data: &[u8]) -> Result<RawFrame, ImageError> {
    let rgb = match crates_image::load_from_memory(data)? {
        DynamicImage::ImageRgb8(buf) => buf,
        other => other.to_rgb8(),
    };
    let (width, height) = rgb.dimensions();
    RawFrame::from_raw(
        width as usize,
        height as usize,
        ColorOrder::Rgb,
        rgb.into_raw(),
    )
}

/// Resizes a 3-channel frame to exactly `width` x `height`.
///
/// Uses the triangle (bilinear) filter, so output is deterministic for a
/// given input. Aspect ratio is not preserved. Channel order is kept.
///
/// # Errors
///
/// Returns `ImageError::Decode` if the frame is empty or not 3-channel.
pub fn resize_bilinear(
    frame: &RawFrame,
    width: usize,
    height: usize,
) -> Result<RawFrame, ImageError> {
    if frame.channels() != 3 {
        return Err(ImageError::Decode(format!(
            "expected 3 channels, got {}",
            frame.channels()
        )));
    }
    if frame.is_empty() || width == 0 || height == 0 {
        return Err(ImageError::Decode(format!(
            "cannot resize {}x{} frame to {}x{}",
            frame.width(),
            frame.height(),
            width,
            height
        )));
    }
    if frame.width() == width && frame.height() == height {
        return Ok(frame.clone());
    }

    let source = RgbImage::from_raw(
        frame.width() as u32,
        frame.height() as u32,
        frame.pixels.data.clone(),
    )
    .ok_or_else(|| ImageError::Decode("pixel buffer smaller than frame size".to_string()))?;

    let resized = imageops::resize(&source, width as u32, height as u32, FilterType::Triangle);
    RawFrame::from_raw(width, height, frame.order, resized.into_raw())
}
