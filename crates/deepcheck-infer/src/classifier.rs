use crate::{INPUT_SIZE, InferError, Normalization};
use deepcheck_base::Tensor;
use serde::Serialize;

/// Output index of the "fake" class.
pub const FAKE_INDEX: usize = 0;
/// Output index of the "real" class.
pub const REAL_INDEX: usize = 1;

/// A binary real/fake image classifier.
///
/// Implementations must be deterministic and safe to call from several
/// threads at once; a loaded model is shared by every request.
pub trait Classifier: Send + Sync {
    /// Raw scores (logits) for one `[3, S, S]` input, where `S` is
    /// `input_size()`. A working model returns exactly two values, indexed by
    /// `FAKE_INDEX` and `REAL_INDEX`.
    fn forward(&self, input: &Tensor<f32>) -> Result<Vec<f32>, InferError>;

    /// Intensity mapping the model was trained with.
    fn normalization(&self) -> Normalization {
        Normalization::MeanStd
    }

    fn input_size(&self) -> usize {
        INPUT_SIZE
    }
}

/// Softmax probabilities for one classified frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProbabilityPair {
    pub real: f32,
    pub fake: f32,
}

impl ProbabilityPair {
    /// Softmax over a two-class output.
    ///
    /// # Errors
    ///
    /// `InferError::ModelInvocation` unless there are exactly two finite
    /// logits.
    pub fn from_logits(logits: &[f32]) -> Result<Self, InferError> {
        if logits.len() != 2 {
            return Err(InferError::ModelInvocation(format!(
                "expected 2 class scores, got {}",
                logits.len()
            )));
        }
        if logits.iter().any(|v| !v.is_finite()) {
            return Err(InferError::ModelInvocation(format!(
                "non-finite class scores {logits:?}"
            )));
        }
        let probs = softmax(logits);
        Ok(Self {
            real: probs[REAL_INDEX],
            fake: probs[FAKE_INDEX],
        })
    }
}

/// Numerically stable softmax.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|v| v / sum).collect()
}

/// Run one preprocessed input through `classifier`.
///
/// # Errors
///
/// `InferError::ModelInvocation` if the input is not `[3, S, S]` for the
/// classifier's input size, or the model output is not two finite scores.
pub fn classify(
    classifier: &dyn Classifier,
    input: &Tensor<f32>,
) -> Result<ProbabilityPair, InferError> {
    let size = classifier.input_size();
    if input.dims3() != Some((3, size, size)) {
        return Err(InferError::ModelInvocation(format!(
            "expected input shape [3, {size}, {size}], got {:?}",
            input.shape
        )));
    }
    let logits = classifier.forward(input)?;
    ProbabilityPair::from_logits(&logits)
}
