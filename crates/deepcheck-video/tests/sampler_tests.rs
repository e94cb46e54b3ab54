use deepcheck_video::{FrameSampler, MemorySource, SamplingPolicy, VideoError};

fn stride(n: usize) -> SamplingPolicy {
    SamplingPolicy::new(n).unwrap()
}

#[test]
fn test_policy_rejects_zero_stride() {
    let err = SamplingPolicy::new(0).unwrap_err();
    assert!(matches!(err, VideoError::InvalidPolicy(_)));
    assert_eq!(err.to_string(), "invalid sampling policy: stride must be positive");
}

#[test]
fn test_policy_default_stride_is_ten() {
    assert_eq!(SamplingPolicy::default().stride(), 10);
}

#[test]
fn test_stride_ten_over_hundred_frames() {
    let source = MemorySource::numbered(100, 4, 4).unwrap();
    let mut sampler = FrameSampler::new(source, stride(10));

    let sampled: Vec<_> = sampler.by_ref().map(|r| r.unwrap()).collect();

    let indices: Vec<usize> = sampled.iter().map(|s| s.index).collect();
    assert_eq!(indices, vec![0, 10, 20, 30, 40, 50, 60, 70, 80, 90]);
    // content identifies the decoded frame, not just the counter
    for s in &sampled {
        assert_eq!(s.frame.pixels.data[0] as usize, s.index);
    }
    assert_eq!(sampler.decoded(), 100);
    assert_eq!(sampler.sampled(), 10);
}

#[test]
fn test_stride_one_keeps_every_frame() {
    let source = MemorySource::numbered(7, 2, 2).unwrap();
    let count = FrameSampler::new(source, stride(1)).count();
    assert_eq!(count, 7);
}

#[test]
fn test_stride_longer_than_video_keeps_first_frame() {
    let source = MemorySource::numbered(5, 2, 2).unwrap();
    let indices: Vec<usize> = FrameSampler::new(source, stride(10))
        .map(|r| r.unwrap().index)
        .collect();
    assert_eq!(indices, vec![0]);
}

#[test]
fn test_partial_last_stride() {
    let source = MemorySource::numbered(21, 2, 2).unwrap();
    let indices: Vec<usize> = FrameSampler::new(source, stride(10))
        .map(|r| r.unwrap().index)
        .collect();
    assert_eq!(indices, vec![0, 10, 20]);
}

#[test]
fn test_zero_frame_video_is_empty_not_error() {
    let mut sampler = FrameSampler::new(MemorySource::new(Vec::new()), stride(10));
    assert!(sampler.next().is_none());
    assert_eq!(sampler.decoded(), 0);
}

#[test]
fn test_unreadable_first_frame_is_open_error() {
    let source = MemorySource::numbered(3, 2, 2).unwrap().failing_at(0, "no such stream");
    let mut sampler = FrameSampler::new(source, stride(10));
    assert!(matches!(sampler.next(), Some(Err(VideoError::Open(_)))));
    assert!(sampler.next().is_none());
}

#[test]
fn test_error_mid_stream_stops_sampling() {
    let source = MemorySource::numbered(30, 2, 2).unwrap().failing_at(15, "corrupt packet");
    let mut sampler = FrameSampler::new(source, stride(10));

    assert_eq!(sampler.next().unwrap().unwrap().index, 0);
    assert_eq!(sampler.next().unwrap().unwrap().index, 10);
    match sampler.next() {
        Some(Err(VideoError::Decode(msg))) => assert_eq!(msg, "corrupt packet"),
        other => panic!("expected decode error, got {other:?}"),
    }
    // fused, no retry past the failure
    assert!(sampler.next().is_none());
    assert_eq!(sampler.decoded(), 15);
}

#[test]
fn test_sampler_is_not_restartable() {
    let source = MemorySource::numbered(20, 2, 2).unwrap();
    let mut sampler = FrameSampler::new(source, stride(10));
    assert_eq!(sampler.by_ref().count(), 2);
    assert_eq!(sampler.by_ref().count(), 0);
}
