use crate::{SamplingPolicy, VideoError, VideoSource};
use deepcheck_image::RawFrame;
use std::iter::FusedIterator;

/// A frame kept by the sampler, with its 0-based decode index.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledFrame {
    pub index: usize,
    pub frame: RawFrame,
}

/// Walks a `VideoSource` once, yielding the frames selected by a
/// `SamplingPolicy` in decode order.
///
/// Every frame is decoded, including skipped ones, so indices always match
/// stream positions. The iterator is fused: after the end of the stream or
/// the first error it only returns `None`.
#[derive(Debug)]
pub struct FrameSampler<S> {
    source: S,
    policy: SamplingPolicy,
    decoded: usize,
    sampled: usize,
    done: bool,
}

impl<S: VideoSource> FrameSampler<S> {
    pub fn new(source: S, policy: SamplingPolicy) -> Self {
        Self {
            source,
            policy,
            decoded: 0,
            sampled: 0,
            done: false,
        }
    }

    pub fn policy(&self) -> SamplingPolicy {
        self.policy
    }

    /// Frames decoded so far, sampled or not.
    pub fn decoded(&self) -> usize {
        self.decoded
    }

    /// Frames yielded so far.
    pub fn sampled(&self) -> usize {
        self.sampled
    }
}

impl<S: VideoSource> Iterator for FrameSampler<S> {
    type Item = Result<SampledFrame, VideoError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.source.next_frame() {
                Ok(Some(frame)) => {
                    let index = self.decoded;
                    self.decoded += 1;
                    if self.policy.should_sample(index) {
                        self.sampled += 1;
                        return Some(Ok(SampledFrame { index, frame }));
                    }
                }
                Ok(None) => self.done = true,
                Err(error) => {
                    self.done = true;
                    return Some(Err(error));
                }
            }
        }
        None
    }
}

impl<S: VideoSource> FusedIterator for FrameSampler<S> {}
