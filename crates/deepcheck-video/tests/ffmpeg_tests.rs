use deepcheck_image::ColorOrder;
use deepcheck_video::{FfmpegSource, FrameSampler, SamplingPolicy, VideoError, VideoSource};
use std::path::PathBuf;
use std::process::Command;

fn ffmpeg_available() -> bool {
    Command::new("ffmpeg").arg("-version").output().is_ok()
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("deepcheck-video-test-{}-{}", std::process::id(), name))
}

/// Render a synthetic MJPEG clip with ffmpeg's test source.
fn make_clip(name: &str, frames: usize) -> PathBuf {
    let path = temp_path(name);
    let status = Command::new("ffmpeg")
        .args(["-y", "-loglevel", "error", "-f", "lavfi"])
        .args(["-i", "testsrc=size=64x48:rate=10"])
        .args(["-frames:v", &frames.to_string(), "-c:v", "mjpeg", "-q:v", "3"])
        .arg(&path)
        .status()
        .expect("ffmpeg failed to run");
    assert!(status.success());
    path
}

#[test]
fn test_open_missing_file() {
    let result = FfmpegSource::open("/nonexistent/clip.mp4");
    assert!(matches!(result, Err(VideoError::Open(_))));
}

#[test]
fn test_decode_synthetic_clip() {
    if !ffmpeg_available() {
        eprintln!("Skipping: ffmpeg not found");
        return;
    }
    let path = make_clip("decode.avi", 25);

    let mut source = FfmpegSource::open(&path).unwrap();
    let first = source.next_frame().unwrap().expect("clip has frames");
    assert_eq!(first.order, ColorOrder::Bgr);
    assert_eq!((first.width(), first.height(), first.channels()), (64, 48, 3));

    let mut count = 1;
    while source.next_frame().unwrap().is_some() {
        count += 1;
    }
    assert_eq!(count, 25);
    assert_eq!(source.frames(), 25);
    // end of stream is sticky
    assert!(source.next_frame().unwrap().is_none());

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_sample_synthetic_clip() {
    if !ffmpeg_available() {
        eprintln!("Skipping: ffmpeg not found");
        return;
    }
    let path = make_clip("sample.avi", 25);

    let source = FfmpegSource::open(&path).unwrap();
    let indices: Vec<usize> = FrameSampler::new(source, SamplingPolicy::new(10).unwrap())
        .map(|r| r.unwrap().index)
        .collect();
    assert_eq!(indices, vec![0, 10, 20]);

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_unreadable_container_is_open_error() {
    if !ffmpeg_available() {
        eprintln!("Skipping: ffmpeg not found");
        return;
    }
    let path = temp_path("garbage.mp4");
    std::fs::write(&path, b"this is not a video container").unwrap();

    let mut source = FfmpegSource::open(&path).unwrap();
    assert!(matches!(source.next_frame(), Err(VideoError::Open(_))));

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_drop_mid_stream_does_not_hang() {
    if !ffmpeg_available() {
        eprintln!("Skipping: ffmpeg not found");
        return;
    }
    let path = make_clip("drop.avi", 50);

    let mut source = FfmpegSource::open(&path).unwrap();
    assert!(source.next_frame().unwrap().is_some());
    drop(source);

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_truncated_clip_is_decode_error() {
    if !ffmpeg_available() {
        eprintln!("Skipping: ffmpeg not found");
        return;
    }
    // uncompressed frames, so a cut inside a frame leaves a short packet
    let path = temp_path("truncated.avi");
    let status = Command::new("ffmpeg")
        .args(["-y", "-loglevel", "error", "-f", "lavfi"])
        .args(["-i", "testsrc=size=64x48:rate=10"])
        .args(["-frames:v", "10", "-c:v", "rawvideo", "-pix_fmt", "bgr24"])
        .arg(&path)
        .status()
        .expect("ffmpeg failed to run");
    assert!(status.success());

    let bytes = std::fs::read(&path).unwrap();
    let frame_bytes = 64 * 48 * 3;
    // drop the index, the last frame and half of the one before it
    let cut = bytes.len() - 2 * frame_bytes;
    std::fs::write(&path, &bytes[..cut]).unwrap();

    let mut source = FfmpegSource::open(&path).unwrap();
    let mut decoded = 0;
    let error = loop {
        match source.next_frame() {
            Ok(Some(_)) => decoded += 1,
            Ok(None) => panic!("truncated clip ended cleanly after {decoded} frames"),
            Err(e) => break e,
        }
    };
    assert!(decoded > 0);
    assert!(matches!(error, VideoError::Decode(_)), "got {error:?}");

    std::fs::remove_file(&path).ok();
}
