use deepcheck_infer::{InferError, MediaInput, MediaKind, MediaSource};
use std::path::Path;

#[test]
fn test_kind_from_extension() {
    assert_eq!(MediaKind::from_path(Path::new("a.jpg")).unwrap(), MediaKind::Image);
    assert_eq!(MediaKind::from_path(Path::new("a.JPEG")).unwrap(), MediaKind::Image);
    assert_eq!(MediaKind::from_path(Path::new("a.png")).unwrap(), MediaKind::Image);
    assert_eq!(MediaKind::from_path(Path::new("clip.MP4")).unwrap(), MediaKind::Video);
    assert_eq!(MediaKind::from_path(Path::new("clip.avi")).unwrap(), MediaKind::Video);
    assert_eq!(MediaKind::from_path(Path::new("clip.mov")).unwrap(), MediaKind::Video);
}

#[test]
fn test_unsupported_extension() {
    let result = MediaInput::from_path("notes.txt");
    assert!(matches!(result, Err(InferError::UnsupportedMedia(_))));

    let result = MediaInput::from_path("no_extension");
    assert!(matches!(result, Err(InferError::UnsupportedMedia(_))));
}

#[test]
fn test_from_path_does_not_read() {
    // declaring a missing file is fine, reading happens at inference time
    let input = MediaInput::from_path("/nonexistent/face.png").unwrap();
    assert_eq!(input.kind(), MediaKind::Image);
    assert!(matches!(input.source(), MediaSource::File(_)));
    assert_eq!(input.name(), "/nonexistent/face.png");
}

#[test]
fn test_from_bytes() {
    let input = MediaInput::from_bytes(MediaKind::Video, vec![1, 2, 3], "upload");
    assert_eq!(input.kind(), MediaKind::Video);
    assert_eq!(input.name(), "upload");
    assert!(matches!(input.source(), MediaSource::Memory(data) if data.len() == 3));
}

#[test]
fn test_kind_from_str() {
    assert_eq!("image".parse::<MediaKind>().unwrap(), MediaKind::Image);
    assert_eq!("Video".parse::<MediaKind>().unwrap(), MediaKind::Video);
    assert!("audio".parse::<MediaKind>().is_err());
}

#[test]
fn test_error_kind_names() {
    assert_eq!(InferError::UnsupportedMedia(String::new()).kind(), "UnsupportedMediaError");
    assert_eq!(InferError::Decode(String::new()).kind(), "DecodeError");
    assert_eq!(InferError::MediaRead(String::new()).kind(), "MediaReadError");
    assert_eq!(InferError::ModelInvocation(String::new()).kind(), "ModelInvocationError");
    assert_eq!(
        InferError::ProcessingTimeout(std::time::Duration::from_secs(1)).kind(),
        "ProcessingTimeout"
    );
}
