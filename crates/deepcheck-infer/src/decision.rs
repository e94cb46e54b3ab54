use crate::ProbabilityPair;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Label {
    Real,
    Fake,
    /// No frame was scored.
    Unknown,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Real => write!(f, "Real"),
            Label::Fake => write!(f, "Fake"),
            Label::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Final verdict for one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    label: Label,
    real_probability: f32,
    fake_probability: f32,
    samples: usize,
}

impl PredictionResult {
    pub fn label(&self) -> Label {
        self.label
    }

    pub fn real_probability(&self) -> f32 {
        self.real_probability
    }

    pub fn fake_probability(&self) -> f32 {
        self.fake_probability
    }

    /// Number of frames that went into the probabilities.
    pub fn samples(&self) -> usize {
        self.samples
    }
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Prediction: {}", self.label)?;
        writeln!(f, "Real Probability: {:.2}%", self.real_probability * 100.0)?;
        write!(f, "Fake Probability: {:.2}%", self.fake_probability * 100.0)
    }
}

/// Running mean of per-frame probabilities.
///
/// Sums are kept in f64 so long videos don't lose precision; the mean does
/// not depend on the order pairs are pushed in.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    real_sum: f64,
    fake_sum: f64,
    count: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pair: ProbabilityPair) {
        self.real_sum += pair.real as f64;
        self.fake_sum += pair.fake as f64;
        self.count += 1;
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Mean probabilities and the label they imply. `Real` wins ties; with
    /// nothing pushed the result is `Unknown` with both probabilities 0.
    pub fn finish(&self) -> PredictionResult {
        if self.count == 0 {
            return PredictionResult {
                label: Label::Unknown,
                real_probability: 0.0,
                fake_probability: 0.0,
                samples: 0,
            };
        }
        let real = (self.real_sum / self.count as f64) as f32;
        let fake = (self.fake_sum / self.count as f64) as f32;
        PredictionResult {
            label: if real >= fake { Label::Real } else { Label::Fake },
            real_probability: real,
            fake_probability: fake,
            samples: self.count,
        }
    }
}

/// Decide a label from per-frame probability pairs.
pub fn decide(pairs: &[ProbabilityPair]) -> PredictionResult {
    let mut aggregator = Aggregator::new();
    for &pair in pairs {
        aggregator.push(pair);
    }
    aggregator.finish()
}
