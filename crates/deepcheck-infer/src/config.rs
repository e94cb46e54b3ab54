use crate::{InferError, Normalization};
use deepcheck_video::{DEFAULT_STRIDE, SamplingPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_MS: u64 = 120_000;
pub const DEFAULT_MAX_CONCURRENT: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceChoice {
    Cpu,
    Cuda,
    #[default]
    Auto,
}

/// How a video is reduced to frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoMode {
    /// Every `stride`-th frame, averaged.
    #[default]
    Sampled,
    /// Only the first frame.
    FirstFrame,
}

/// Detector settings, loadable from a JSON file. Missing fields take their
/// defaults; unknown fields are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectorConfig {
    model_path: Option<PathBuf>,
    normalization: Normalization,
    stride: usize,
    video_mode: VideoMode,
    timeout_ms: u64,
    max_concurrent: usize,
    device: DeviceChoice,
    log_dir: Option<PathBuf>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            normalization: Normalization::default(),
            stride: DEFAULT_STRIDE,
            video_mode: VideoMode::default(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            device: DeviceChoice::default(),
            log_dir: None,
        }
    }
}

impl DetectorConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InferError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| InferError::Config(format!("{}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| InferError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), InferError> {
        if self.stride == 0 {
            return Err(InferError::Config("stride must be at least 1".to_string()));
        }
        if self.timeout_ms == 0 {
            return Err(InferError::Config("timeout_ms must be positive".to_string()));
        }
        if self.max_concurrent == 0 {
            return Err(InferError::Config("max_concurrent must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    pub fn with_video_mode(mut self, mode: VideoMode) -> Self {
        self.video_mode = mode;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis().min(u64::MAX as u128) as u64;
        self
    }

    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max;
        self
    }

    pub fn with_device(mut self, device: DeviceChoice) -> Self {
        self.device = device;
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    pub fn model_path(&self) -> Option<&Path> {
        self.model_path.as_deref()
    }

    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn video_mode(&self) -> VideoMode {
        self.video_mode
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    pub fn device(&self) -> DeviceChoice {
        self.device
    }

    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }

    pub fn sampling_policy(&self) -> Result<SamplingPolicy, InferError> {
        Ok(SamplingPolicy::new(self.stride)?)
    }
}
