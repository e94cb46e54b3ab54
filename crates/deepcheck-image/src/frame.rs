use crate::ImageError;
use deepcheck_base::Tensor;

/// Channel order of an 8-bit pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorOrder {
    Rgb,
    /// Blue first, as produced by ffmpeg `bgr24` output.
    Bgr,
}

/// A decoded image or video frame.
///
/// Pixels are HWC (`[height, width, channels]`). Shape is only checked for
/// rank here; channel count and area are validated by whoever consumes the
/// frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame {
    pub pixels: Tensor<u8>,
    pub order: ColorOrder,
}

impl RawFrame {
    pub fn new(pixels: Tensor<u8>, order: ColorOrder) -> Result<Self, ImageError> {
        if pixels.ndim() != 3 {
            return Err(ImageError::Decode(format!(
                "expected HWC pixel buffer, got shape {:?}",
                pixels.shape
            )));
        }
        Ok(Self { pixels, order })
    }

    /// Interleaved 3-channel frame from raw bytes.
    pub fn from_raw(
        width: usize,
        height: usize,
        order: ColorOrder,
        data: Vec<u8>,
    ) -> Result<Self, ImageError> {
        Self::new(Tensor::new(vec![height, width, 3], data)?, order)
    }

    // the fields are public, so a frame may not have gone through `new`
    fn dim(&self, axis: usize) -> usize {
        if self.pixels.ndim() == 3 {
            self.pixels.shape[axis]
        } else {
            0
        }
    }

    pub fn height(&self) -> usize {
        self.dim(0)
    }

    pub fn width(&self) -> usize {
        self.dim(1)
    }

    /// Channel count, 0 if the pixel buffer is not HWC.
    pub fn channels(&self) -> usize {
        self.dim(2)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Reorder channels to RGB. RGB frames are returned unchanged.
    pub fn into_rgb(mut self) -> Self {
        if self.order == ColorOrder::Bgr && self.channels() >= 3 {
            let channels = self.channels();
            for pixel in self.pixels.data.chunks_exact_mut(channels) {
                pixel.swap(0, 2);
            }
            self.order = ColorOrder::Rgb;
        }
        self
    }
}
