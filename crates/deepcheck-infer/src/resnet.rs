use crate::{Classifier, InferError, Normalization};
use candle_core::{DType, Device, Module, Tensor as CanTensor};
use candle_nn::{Func, VarBuilder};
use candle_transformers::models::resnet;
use deepcheck_base::Tensor;
use std::fmt;
use std::path::Path;

// prefix some training scripts leave on every key (a wrapped `model` field)
const WRAPPED_PREFIX: &str = "model";
const NUM_CLASSES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResNetDepth {
    R18,
    R34,
    R50,
    R101,
    R152,
}

impl ResNetDepth {
    fn build(self, vb: VarBuilder<'static>) -> candle_core::Result<Func<'static>> {
        match self {
            ResNetDepth::R18 => resnet::resnet18(NUM_CLASSES, vb),
            ResNetDepth::R34 => resnet::resnet34(NUM_CLASSES, vb),
            ResNetDepth::R50 => resnet::resnet50(NUM_CLASSES, vb),
            ResNetDepth::R101 => resnet::resnet101(NUM_CLASSES, vb),
            ResNetDepth::R152 => resnet::resnet152(NUM_CLASSES, vb),
        }
    }
}

impl fmt::Display for ResNetDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let depth = match self {
            ResNetDepth::R18 => 18,
            ResNetDepth::R34 => 34,
            ResNetDepth::R50 => 50,
            ResNetDepth::R101 => 101,
            ResNetDepth::R152 => 152,
        };
        write!(f, "resnet{depth}")
    }
}

/// What the safetensors header says about a ResNet checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pub depth: ResNetDepth,
    /// Every key carries the `model.` prefix.
    pub prefixed: bool,
}

/// Work out the ResNet depth of a safetensors checkpoint from its keys.
///
/// Bottleneck blocks have a `conv3`; the number of blocks in `layer3` then
/// tells the depths apart. The `fc` head must have two outputs.
pub fn detect_architecture(path: &Path) -> Result<Checkpoint, InferError> {
    use safetensors::SafeTensors;

    let file = std::fs::File::open(path)
        .map_err(|e| InferError::ModelLoad(format!("{}: {e}", path.display())))?;
    let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(|e| {
        InferError::ModelLoad(format!("failed to memory-map {}: {e}", path.display()))
    })?;
    let tensors = SafeTensors::deserialize(&mmap)
        .map_err(|e| InferError::ModelLoad(format!("failed to deserialize safetensors: {e}")))?;

    let prefixed = tensors
        .tensor(&format!("{WRAPPED_PREFIX}.conv1.weight"))
        .is_ok();
    let key = |name: &str| {
        if prefixed {
            format!("{WRAPPED_PREFIX}.{name}")
        } else {
            name.to_string()
        }
    };

    let fc = tensors
        .tensor(&key("fc.weight"))
        .map_err(|e| InferError::ModelLoad(format!("no classifier head 'fc.weight': {e}")))?;
    if fc.shape().first() != Some(&NUM_CLASSES) {
        return Err(InferError::ModelLoad(format!(
            "classifier head has shape {:?}, expected {} outputs",
            fc.shape(),
            NUM_CLASSES
        )));
    }

    let bottleneck = tensors.tensor(&key("layer1.0.conv3.weight")).is_ok();
    let layer3 = key("layer3.");
    let blocks = tensors
        .names()
        .into_iter()
        .filter_map(|name| name.strip_prefix(layer3.as_str()))
        .filter_map(|rest| rest.split('.').next()?.parse::<usize>().ok())
        .max()
        .map_or(0, |last| last + 1);

    let depth = match (bottleneck, blocks) {
        (false, 2) => ResNetDepth::R18,
        (false, 6) => ResNetDepth::R34,
        (true, 6) => ResNetDepth::R50,
        (true, 23) => ResNetDepth::R101,
        (true, 36) => ResNetDepth::R152,
        _ => {
            return Err(InferError::ModelLoad(format!(
                "unrecognized ResNet layout: {} layer3 blocks, bottleneck {}",
                blocks, bottleneck
            )));
        }
    };

    Ok(Checkpoint { depth, prefixed })
}

/// Two-class ResNet running on candle, loaded from safetensors.
pub struct ResNetClassifier {
    model: Func<'static>,
    depth: ResNetDepth,
    device: Device,
    normalization: Normalization,
}

impl fmt::Debug for ResNetClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResNetClassifier")
            .field("depth", &self.depth)
            .field("device", &self.device)
            .field("normalization", &self.normalization)
            .finish()
    }
}

impl ResNetClassifier {
    pub(crate) fn load(
        model_path: impl AsRef<Path>,
        device: Device,
        normalization: Normalization,
    ) -> Result<Self, InferError> {
        let path = model_path.as_ref();
        let checkpoint = detect_architecture(path)?;

        let weights = unsafe { VarBuilder::from_mmaped_safetensors(&[path], DType::F32, &device) }
            .map_err(|e| InferError::ModelLoad(e.to_string()))?;
        let weights = if checkpoint.prefixed {
            weights.pp(WRAPPED_PREFIX)
        } else {
            weights
        };

        let model = checkpoint
            .depth
            .build(weights)
            .map_err(|e| InferError::ModelLoad(format!("{}: {e}", checkpoint.depth)))?;
        log::info!(
            "loaded {} from {} (prefixed keys: {})",
            checkpoint.depth,
            path.display(),
            checkpoint.prefixed
        );

        Ok(Self {
            model,
            depth: checkpoint.depth,
            device,
            normalization,
        })
    }

    pub fn depth(&self) -> ResNetDepth {
        self.depth
    }

    pub fn device(&self) -> &Device {
        &self.device
    }
}

impl Classifier for ResNetClassifier {
    fn forward(&self, input: &Tensor<f32>) -> Result<Vec<f32>, InferError> {
        let (c, h, w) = input.dims3().ok_or_else(|| {
            InferError::ModelInvocation(format!("expected CHW input, got shape {:?}", input.shape))
        })?;
        let batch = CanTensor::from_slice(&input.data, (1, c, h, w), &self.device)?;
        let logits = self.model.forward(&batch)?;
        Ok(logits.flatten_all()?.to_dtype(DType::F32)?.to_vec1::<f32>()?)
    }

    fn normalization(&self) -> Normalization {
        self.normalization
    }
}
