use crate::VideoError;
use deepcheck_image::{ColorOrder, RawFrame};
use std::collections::VecDeque;

/// A video decoded one frame at a time, in stream order.
pub trait VideoSource: Send {
    /// Decode the next frame. `Ok(None)` marks the end of the stream.
    fn next_frame(&mut self) -> Result<Option<RawFrame>, VideoError>;
}

impl<S: VideoSource + ?Sized> VideoSource for Box<S> {
    fn next_frame(&mut self) -> Result<Option<RawFrame>, VideoError> {
        (**self).next_frame()
    }
}

/// A video whose frames are already in memory.
#[derive(Debug, Default)]
pub struct MemorySource {
    frames: VecDeque<RawFrame>,
    position: usize,
    fail_at: Option<(usize, String)>,
}

impl MemorySource {
    pub fn new(frames: Vec<RawFrame>) -> Self {
        Self {
            frames: frames.into(),
            position: 0,
            fail_at: None,
        }
    }

    /// `count` frames of `width` x `height` RGB, each filled with its own
    /// index (mod 256), so sampled frames can be identified by content.
    pub fn numbered(count: usize, width: usize, height: usize) -> Result<Self, VideoError> {
        let frames = (0..count)
            .map(|index| {
                RawFrame::from_raw(
                    width,
                    height,
                    ColorOrder::Rgb,
                    vec![(index % 256) as u8; width * height * 3],
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(frames))
    }

    /// Fail with `message` instead of producing frame `index`.
    pub fn failing_at(mut self, index: usize, message: impl Into<String>) -> Self {
        self.fail_at = Some((index, message.into()));
        self
    }
}

impl VideoSource for MemorySource {
    fn next_frame(&mut self) -> Result<Option<RawFrame>, VideoError> {
        if let Some((index, message)) = &self.fail_at {
            if *index == self.position {
                let error = if self.position == 0 {
                    VideoError::Open(message.clone())
                } else {
                    VideoError::Decode(message.clone())
                };
                return Err(error);
            }
        }
        let frame = self.frames.pop_front();
        if frame.is_some() {
            self.position += 1;
        }
        Ok(frame)
    }
}
