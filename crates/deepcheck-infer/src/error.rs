use std::fmt;
use std::time::Duration;

#[derive(Debug)]
pub enum InferError {
    /// Malformed or unreadable image or frame.
    Decode(String),
    /// Video stream could not be opened or ended in a decode failure.
    MediaRead(String),
    /// Input shape or output arity did not match the classifier.
    ModelInvocation(String),
    /// File kind is neither a supported image nor a supported video.
    UnsupportedMedia(String),
    ProcessingTimeout(Duration),
    ModelLoad(String),
    Config(String),
    Io(String),
    Runtime(String),
}

impl InferError {
    /// Name of the error kind, as shown to users.
    pub fn kind(&self) -> &'static str {
        match self {
            InferError::Decode(_) => "DecodeError",
            InferError::MediaRead(_) => "MediaReadError",
            InferError::ModelInvocation(_) => "ModelInvocationError",
            InferError::UnsupportedMedia(_) => "UnsupportedMediaError",
            InferError::ProcessingTimeout(_) => "ProcessingTimeout",
            InferError::ModelLoad(_) => "ModelLoadError",
            InferError::Config(_) => "ConfigError",
            InferError::Io(_) => "IoError",
            InferError::Runtime(_) => "RuntimeError",
        }
    }
}

impl fmt::Display for InferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferError::Decode(msg) => write!(f, "decode error: {msg}"),
            InferError::MediaRead(msg) => write!(f, "media read error: {msg}"),
            InferError::ModelInvocation(msg) => write!(f, "model invocation error: {msg}"),
            InferError::UnsupportedMedia(msg) => write!(f, "unsupported media: {msg}"),
            InferError::ProcessingTimeout(limit) => {
                write!(f, "processing exceeded {} ms", limit.as_millis())
            }
            InferError::ModelLoad(msg) => write!(f, "model load error: {msg}"),
            InferError::Config(msg) => write!(f, "config error: {msg}"),
            InferError::Io(msg) => write!(f, "io error: {msg}"),
            InferError::Runtime(msg) => write!(f, "runtime error: {msg}"),
        }
    }
}

impl std::error::Error for InferError {}

impl From<deepcheck_image::ImageError> for InferError {
    fn from(err: deepcheck_image::ImageError) -> Self {
        InferError::Decode(err.to_string())
    }
}

impl From<deepcheck_video::VideoError> for InferError {
    fn from(err: deepcheck_video::VideoError) -> Self {
        match err {
            deepcheck_video::VideoError::InvalidPolicy(_) => InferError::Config(err.to_string()),
            _ => InferError::MediaRead(err.to_string()),
        }
    }
}

// candle errors outside model loading come from a forward pass
impl From<candle_core::Error> for InferError {
    fn from(err: candle_core::Error) -> Self {
        InferError::ModelInvocation(err.to_string())
    }
}

impl From<std::io::Error> for InferError {
    fn from(err: std::io::Error) -> Self {
        InferError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for InferError {
    fn from(err: serde_json::Error) -> Self {
        InferError::Config(err.to_string())
    }
}
