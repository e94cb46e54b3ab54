use crate::{
    Aggregator, Classifier, DetectorConfig, InferError, MediaInput, MediaKind, MediaSource,
    PredictionResult, ProbabilityPair, VideoMode, classify, decide, preprocess_sized,
};
use deepcheck_image::{RawFrame, decode_image};
use deepcheck_video::{FfmpegSource, FrameSampler, VideoSource};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Classifies images and videos as real or fake.
///
/// Holds one loaded classifier, shared by every request and every clone.
/// Each request owns its own frame stream, so requests can run in parallel.
#[derive(Clone)]
pub struct Detector {
    classifier: Arc<dyn Classifier>,
    config: Arc<DetectorConfig>,
}

impl fmt::Debug for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Detector")
            .field("normalization", &self.classifier.normalization())
            .field("input_size", &self.classifier.input_size())
            .field("config", &self.config)
            .finish()
    }
}

impl Detector {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        config: DetectorConfig,
    ) -> Result<Self, InferError> {
        config.validate()?;
        Ok(Self {
            classifier,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Preprocess and score a single frame.
    pub fn classify_frame(&self, frame: RawFrame) -> Result<ProbabilityPair, InferError> {
        let input = preprocess_sized(
            frame,
            self.classifier.input_size(),
            self.classifier.normalization(),
        )?;
        classify(self.classifier.as_ref(), &input)
    }

    /// Classify an encoded still image.
    pub fn infer_image(&self, data: &[u8]) -> Result<PredictionResult, InferError> {
        let frame = decode_image(data)?;
        Ok(decide(&[self.classify_frame(frame)?]))
    }

    /// Classify an already-open video, blocking until the stream ends.
    pub fn infer_source<S: VideoSource>(&self, source: S) -> Result<PredictionResult, InferError> {
        self.infer_video(source, "video", &AtomicBool::new(false))
    }

    /// Like `infer_source`, but gives up with `ProcessingTimeout` once
    /// `cancel` is set. The flag is checked before each sampled frame.
    pub fn infer_source_cancellable<S: VideoSource>(
        &self,
        source: S,
        cancel: &AtomicBool,
    ) -> Result<PredictionResult, InferError> {
        self.infer_video(source, "video", cancel)
    }

    /// Run the whole pipeline for `input` on the current thread.
    ///
    /// Video frame loops stop with `ProcessingTimeout` once `cancel` is set.
    pub fn infer_blocking(
        &self,
        input: &MediaInput,
        cancel: &AtomicBool,
    ) -> Result<PredictionResult, InferError> {
        match (input.kind(), input.source()) {
            (MediaKind::Image, MediaSource::File(path)) => {
                let data = std::fs::read(path)
                    .map_err(|e| InferError::Decode(format!("{}: {e}", path.display())))?;
                self.infer_image(&data)
            }
            (MediaKind::Image, MediaSource::Memory(data)) => self.infer_image(data),
            (MediaKind::Video, MediaSource::File(path)) => {
                let source = FfmpegSource::open(path)?;
                self.infer_video(source, input.name(), cancel)
            }
            (MediaKind::Video, MediaSource::Memory(data)) => {
                // ffmpeg reads from a path, keep the spool alive until the source is gone
                let mut spool = tempfile::Builder::new()
                    .prefix("deepcheck-")
                    .suffix(".video")
                    .tempfile()?;
                spool.write_all(data)?;
                spool.flush()?;
                let source = FfmpegSource::open(spool.path())?;
                self.infer_video(source, input.name(), cancel)
            }
        }
    }

    fn infer_video<S: VideoSource>(
        &self,
        source: S,
        name: &str,
        cancel: &AtomicBool,
    ) -> Result<PredictionResult, InferError> {
        let first_only = self.config.video_mode() == VideoMode::FirstFrame;
        let mut sampler = FrameSampler::new(source, self.config.sampling_policy()?);
        let mut aggregator = Aggregator::new();

        while let Some(sampled) = sampler.next() {
            if cancel.load(Ordering::Relaxed) {
                log::debug!("{}: cancelled at frame {}", name, sampler.decoded());
                return Err(InferError::ProcessingTimeout(self.config.timeout()));
            }
            let sampled = sampled?;
            aggregator.push(self.classify_frame(sampled.frame)?);
            if first_only {
                break;
            }
        }

        if first_only && aggregator.is_empty() {
            return Err(InferError::MediaRead(format!("{name}: video has no frames")));
        }
        log::debug!(
            "{}: scored {} of {} decoded frames (stride {})",
            name,
            sampler.sampled(),
            sampler.decoded(),
            sampler.policy().stride()
        );
        Ok(aggregator.finish())
    }

    /// Classify `input` on the blocking pool, giving up after the configured
    /// timeout.
    pub async fn infer(&self, input: MediaInput) -> Result<PredictionResult, InferError> {
        let name = input.name().to_string();
        let limit = self.config.timeout();
        log::info!("{}: starting {} inference", name, input.kind());
        let started = Instant::now();

        let cancel = Arc::new(AtomicBool::new(false));
        let task = {
            let detector = self.clone();
            let cancel = Arc::clone(&cancel);
            tokio::task::spawn_blocking(move || detector.infer_blocking(&input, &cancel))
        };

        let result = match tokio::time::timeout(limit, task).await {
            Ok(joined) => {
                joined.map_err(|e| InferError::Runtime(format!("inference task failed: {e}")))?
            }
            Err(_) => {
                cancel.store(true, Ordering::Relaxed);
                log::warn!("{}: timed out after {} ms", name, limit.as_millis());
                return Err(InferError::ProcessingTimeout(limit));
            }
        };

        match &result {
            Ok(prediction) => log::info!(
                "{}: {} (real {:.4}, fake {:.4}, {} samples) in {:?}",
                name,
                prediction.label(),
                prediction.real_probability(),
                prediction.fake_probability(),
                prediction.samples(),
                started.elapsed()
            ),
            Err(e) => log::warn!("{}: {} {}", name, e.kind(), e),
        }
        result
    }

    pub async fn infer_path(&self, path: impl AsRef<Path>) -> Result<PredictionResult, InferError> {
        let input = MediaInput::from_path(path)?;
        self.infer(input).await
    }

    /// Classify several files, at most `max_concurrent` at a time. Results
    /// come back in input order; one failure does not stop the others.
    pub async fn infer_many(
        &self,
        paths: Vec<PathBuf>,
    ) -> Vec<Result<PredictionResult, InferError>> {
        let limit = self.config.max_concurrent();
        let mut results: Vec<Option<Result<PredictionResult, InferError>>> =
            paths.iter().map(|_| None).collect();
        let mut pending = paths.into_iter().enumerate();
        let mut tasks = tokio::task::JoinSet::new();

        loop {
            while tasks.len() < limit {
                let Some((index, path)) = pending.next() else {
                    break;
                };
                let detector = self.clone();
                tasks.spawn(async move { (index, detector.infer_path(path).await) });
            }

            match tasks.join_next().await {
                Some(Ok((index, result))) => results[index] = Some(result),
                Some(Err(e)) => log::error!("inference task failed: {e}"),
                None => break,
            }
        }

        results
            .into_iter()
            .map(|result| {
                result.unwrap_or_else(|| {
                    Err(InferError::Runtime("inference task failed".to_string()))
                })
            })
            .collect()
    }
}
