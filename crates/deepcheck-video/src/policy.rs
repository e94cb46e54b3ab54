use crate::VideoError;

/// Every tenth frame.
pub const DEFAULT_STRIDE: usize = 10;

/// Which frames of a video get scored: indices `0, stride, 2 * stride, ...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingPolicy {
    stride: usize,
}

impl SamplingPolicy {
    pub fn new(stride: usize) -> Result<Self, VideoError> {
        if stride == 0 {
            return Err(VideoError::InvalidPolicy("stride must be positive".to_string()));
        }
        Ok(Self { stride })
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn should_sample(&self, index: usize) -> bool {
        index % self.stride == 0
    }
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        Self {
            stride: DEFAULT_STRIDE,
        }
    }
}
