use crate::{DeviceChoice, InferError, Normalization, ResNetClassifier};
use candle_core::Device;
use std::path::Path;

/// Compute device shared by every model loaded through it.
#[derive(Debug, Clone)]
pub struct Inference {
    device: Device,
}

impl Inference {
    pub fn cpu() -> Self {
        Self {
            device: Device::Cpu,
        }
    }

    #[cfg(feature = "cuda")]
    pub fn cuda(ordinal: usize) -> Result<Self, InferError> {
        let device = Device::new_cuda(ordinal).map_err(|e| InferError::Runtime(e.to_string()))?;
        Ok(Self { device })
    }

    /// First CUDA device when built with CUDA support and one is present,
    /// CPU otherwise.
    pub fn auto() -> Self {
        match Device::cuda_if_available(0) {
            Ok(device) => Self { device },
            Err(e) => {
                log::warn!("CUDA device unavailable ({e}), using CPU");
                Self::cpu()
            }
        }
    }

    pub fn from_choice(choice: DeviceChoice) -> Result<Self, InferError> {
        let inference = match choice {
            DeviceChoice::Cpu => Self::cpu(),
            #[cfg(feature = "cuda")]
            DeviceChoice::Cuda => Self::cuda(0)?,
            #[cfg(not(feature = "cuda"))]
            DeviceChoice::Cuda => {
                return Err(InferError::Config("CUDA feature not enabled".to_string()));
            }
            DeviceChoice::Auto => Self::auto(),
        };
        log::info!("inference device: {:?}", inference.device);
        Ok(inference)
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn use_resnet_classifier(
        &self,
        model_path: impl AsRef<Path>,
        normalization: Normalization,
    ) -> Result<ResNetClassifier, InferError> {
        ResNetClassifier::load(model_path, self.device.clone(), normalization)
    }
}
