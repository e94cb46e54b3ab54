use crate::{VideoError, VideoSource};
use deepcheck_image::{ColorOrder, RawFrame};
use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use ffmpeg_sidecar::iter::FfmpegIterator;
use std::path::{Path, PathBuf};

// ffmpeg error lines kept for the failure message
const MAX_ERROR_LINES: usize = 8;

/// Video file decoded by an `ffmpeg` child process.
///
/// The first video stream is decoded to packed `bgr24` on the child's stdout,
/// so frames come out in BGR order. `-xerror` makes ffmpeg stop on the first
/// corrupt frame instead of concealing it, and passthrough frame timing keeps
/// ffmpeg from duplicating or dropping frames. The exit status is checked
/// once the stream ends. Needs ffmpeg 5.1 or newer on `PATH`.
pub struct FfmpegSource {
    path: PathBuf,
    child: FfmpegChild,
    events: FfmpegIterator,
    frames: usize,
    errors: Vec<String>,
    finished: bool,
}

impl std::fmt::Debug for FfmpegSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegSource")
            .field("path", &self.path)
            .field("frames", &self.frames)
            .field("finished", &self.finished)
            .finish()
    }
}

impl FfmpegSource {
    /// Start decoding `path`.
    ///
    /// Fails with `VideoError::Open` if the file is missing or ffmpeg cannot
    /// be started. Unreadable containers are reported by the first
    /// `next_frame` call, once ffmpeg has exited.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, VideoError> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(VideoError::Open(format!("{} is not a file", path.display())));
        }

        let mut command = FfmpegCommand::new();
        command
            .hide_banner()
            .arg("-xerror")
            .input(path.to_string_lossy().as_ref())
            .args(["-map", "0:v:0", "-fps_mode", "passthrough"])
            .args(["-f", "rawvideo", "-pix_fmt", "bgr24"])
            .output("-");
        log::debug!("spawning ffmpeg for {}", path.display());

        let mut child = command
            .spawn()
            .map_err(|e| VideoError::Open(format!("failed to start ffmpeg: {e}")))?;
        let events = child
            .iter()
            .map_err(|e| VideoError::Open(format!("failed to read ffmpeg output: {e}")))?;

        Ok(Self {
            path,
            child,
            events,
            frames: 0,
            errors: Vec::new(),
            finished: false,
        })
    }

    /// Number of frames decoded so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    fn record_error(&mut self, line: String) {
        log::debug!("ffmpeg: {}", line);
        if self.errors.len() < MAX_ERROR_LINES {
            self.errors.push(line);
        }
    }

    fn finish(&mut self) -> Result<Option<RawFrame>, VideoError> {
        self.finished = true;
        let status = self.child.wait()?;
        if status.success() {
            return Ok(None);
        }

        let detail = if self.errors.is_empty() {
            format!("ffmpeg exited with {status}")
        } else {
            self.errors.join("; ")
        };
        let message = format!("{}: {}", self.path.display(), detail);
        if self.frames == 0 {
            Err(VideoError::Open(message))
        } else {
            Err(VideoError::Decode(format!("after frame {}: {}", self.frames, message)))
        }
    }
}

impl VideoSource for FfmpegSource {
    fn next_frame(&mut self) -> Result<Option<RawFrame>, VideoError> {
        if self.finished {
            return Ok(None);
        }

        while let Some(event) = self.events.next() {
            match event {
                FfmpegEvent::OutputFrame(frame) => {
                    self.frames += 1;
                    let raw = RawFrame::from_raw(
                        frame.width as usize,
                        frame.height as usize,
                        ColorOrder::Bgr,
                        frame.data,
                    )?;
                    return Ok(Some(raw));
                }
                FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, line) => {
                    self.record_error(line)
                }
                FfmpegEvent::Error(line) => self.record_error(line),
                _ => {}
            }
        }

        self.finish()
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        if !self.finished {
            // sampling was abandoned early, don't leave ffmpeg blocked on a full pipe
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
