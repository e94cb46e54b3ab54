use crate::InferError;
use deepcheck_base::Tensor;
use deepcheck_image::{RawFrame, resize_bilinear};
use serde::{Deserialize, Serialize};

/// Side length of the square classifier input.
pub const INPUT_SIZE: usize = 224;

// per-channel mean and std for `Normalization::MeanStd`
const MEAN: f32 = 0.5;
const STD: f32 = 0.5;

/// How 8-bit intensities are mapped to floats.
///
/// This must match what the paired classifier was trained with; the
/// classifier declares it, callers do not pick it per request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// `v / 255`, range `[0, 1]`.
    UnitRange,
    /// `(v / 255 - 0.5) / 0.5`, range `[-1, 1]`.
    #[default]
    MeanStd,
}

impl Normalization {
    pub fn apply(self, value: u8) -> f32 {
        let unit = value as f32 / 255.0;
        match self {
            Normalization::UnitRange => unit,
            Normalization::MeanStd => (unit - MEAN) / STD,
        }
    }

    fn table(self) -> [f32; 256] {
        std::array::from_fn(|v| self.apply(v as u8))
    }
}

/// Turn a frame into a `[3, INPUT_SIZE, INPUT_SIZE]` classifier input.
pub fn preprocess(
    frame: RawFrame,
    normalization: Normalization,
) -> Result<Tensor<f32>, InferError> {
    preprocess_sized(frame, INPUT_SIZE, normalization)
}

/// Turn a frame into a `[3, size, size]` classifier input.
///
/// The frame is stretched to `size` x `size` with bilinear filtering (aspect
/// ratio is not kept), converted to RGB, normalized and laid out CHW.
///
/// # Errors
///
/// `InferError::Decode` if the frame has zero area or is not 3-channel.
pub fn preprocess_sized(
    frame: RawFrame,
    size: usize,
    normalization: Normalization,
) -> Result<Tensor<f32>, InferError> {
    if frame.channels() != 3 {
        return Err(InferError::Decode(format!(
            "expected 3 channels, got {}",
            frame.channels()
        )));
    }
    if frame.is_empty() {
        return Err(InferError::Decode(format!(
            "frame has zero area ({}x{})",
            frame.width(),
            frame.height()
        )));
    }

    let resized = resize_bilinear(&frame, size, size)?.into_rgb();

    let table = normalization.table();
    let plane = size * size;
    let mut chw = vec![0.0f32; 3 * plane];
    for (i, pixel) in resized.pixels.data.chunks_exact(3).enumerate() {
        chw[i] = table[pixel[0] as usize];
        chw[plane + i] = table[pixel[1] as usize];
        chw[2 * plane + i] = table[pixel[2] as usize];
    }

    Tensor::new(vec![3, size, size], chw).map_err(|e| InferError::Runtime(e.to_string()))
}
