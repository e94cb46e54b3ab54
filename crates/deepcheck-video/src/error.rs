use std::fmt;

#[derive(Debug)]
pub enum VideoError {
    /// The stream could not be opened, or failed before its first frame.
    Open(String),
    /// A frame after the first could not be decoded.
    Decode(String),
    Stream(String),
    /// Sampling settings that select no frames.
    InvalidPolicy(String),
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::Open(msg) => write!(f, "open error: {msg}"),
            VideoError::Decode(msg) => write!(f, "decode error: {msg}"),
            VideoError::Stream(msg) => write!(f, "stream error: {msg}"),
            VideoError::InvalidPolicy(msg) => write!(f, "invalid sampling policy: {msg}"),
        }
    }
}

impl std::error::Error for VideoError {}

impl From<std::io::Error> for VideoError {
    fn from(err: std::io::Error) -> Self {
        VideoError::Stream(err.to_string())
    }
}

impl From<deepcheck_image::ImageError> for VideoError {
    fn from(err: deepcheck_image::ImageError) -> Self {
        VideoError::Decode(err.to_string())
    }
}
