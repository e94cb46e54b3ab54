//! Real/fake classification of images and videos.
//!
//! A `Detector` turns a `MediaInput` into a `PredictionResult`: images are
//! scored once, videos are sampled every `stride` frames and the per-frame
//! probabilities averaged.

pub mod classifier;
pub mod config;
pub mod decision;
pub mod detector;
pub mod error;
pub mod inference;
pub mod media;
pub mod preprocess;
pub mod resnet;

pub use classifier::{Classifier, FAKE_INDEX, ProbabilityPair, REAL_INDEX, classify, softmax};
pub use config::{DetectorConfig, DeviceChoice, VideoMode};
pub use decision::{Aggregator, Label, PredictionResult, decide};
pub use detector::Detector;
pub use error::InferError;
pub use inference::Inference;
pub use media::{MediaInput, MediaKind, MediaSource};
pub use preprocess::{INPUT_SIZE, Normalization, preprocess, preprocess_sized};
pub use resnet::{ResNetClassifier, ResNetDepth, detect_architecture};
