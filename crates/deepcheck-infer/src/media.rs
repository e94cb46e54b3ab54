use crate::InferError;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Kind for a file extension (without the dot), case-insensitive.
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.to_ascii_lowercase();
        if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            Some(MediaKind::Image)
        } else if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, InferError> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| InferError::UnsupportedMedia(path.display().to_string()))
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

impl FromStr for MediaKind {
    type Err = InferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "image" => Ok(MediaKind::Image),
            "video" => Ok(MediaKind::Video),
            other => Err(InferError::UnsupportedMedia(format!("media kind '{other}'"))),
        }
    }
}

/// Where the bytes of a `MediaInput` live.
#[derive(Debug, Clone)]
pub enum MediaSource {
    File(PathBuf),
    Memory(Vec<u8>),
}

/// One file to classify, with its declared kind.
#[derive(Debug, Clone)]
pub struct MediaInput {
    kind: MediaKind,
    source: MediaSource,
    name: String,
}

impl MediaInput {
    /// Declare a file by path. The kind comes from the extension; nothing is
    /// read yet, so unsupported files fail before any decode attempt.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, InferError> {
        let path = path.as_ref();
        let kind = MediaKind::from_path(path)?;
        Ok(Self {
            kind,
            source: MediaSource::File(path.to_path_buf()),
            name: path.display().to_string(),
        })
    }

    /// Declare uploaded bytes of a known kind. `name` is used in logs and
    /// error messages only.
    pub fn from_bytes(kind: MediaKind, bytes: Vec<u8>, name: impl Into<String>) -> Self {
        Self {
            kind,
            source: MediaSource::Memory(bytes),
            name: name.into(),
        }
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn source(&self) -> &MediaSource {
        &self.source
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
