//! Sequential video decoding and frame sampling.
//!
//! A `VideoSource` hands out frames in decode order; `FrameSampler` walks a
//! source once and keeps every `stride`-th frame.

pub mod error;
pub mod ffmpeg;
pub mod policy;
pub mod sampler;
pub mod source;

pub use error::VideoError;
pub use ffmpeg::FfmpegSource;
pub use policy::{DEFAULT_STRIDE, SamplingPolicy};
pub use sampler::{FrameSampler, SampledFrame};
pub use source::{MemorySource, VideoSource};
