use deepcheck_base::Tensor;
use deepcheck_image::{ColorOrder, ImageError, RawFrame, resize_bilinear};

fn solid(width: usize, height: usize, rgb: [u8; 3]) -> RawFrame {
    let data = rgb.iter().copied().cycle().take(width * height * 3).collect();
    RawFrame::from_raw(width, height, ColorOrder::Rgb, data).unwrap()
}

#[test]
fn test_new_rejects_non_hwc_shape() {
    let flat = Tensor::new(vec![12], vec![0u8; 12]).unwrap();
    assert!(RawFrame::new(flat, ColorOrder::Rgb).is_err());
}

#[test]
fn test_from_raw_rejects_short_buffer() {
    let result = RawFrame::from_raw(2, 2, ColorOrder::Rgb, vec![0; 11]);
    assert!(matches!(result, Err(ImageError::Tensor(_))));
}

#[test]
fn test_bgr_into_rgb_swaps_channels() {
    let frame = RawFrame::from_raw(2, 1, ColorOrder::Bgr, vec![1, 2, 3, 4, 5, 6]).unwrap();
    let rgb = frame.into_rgb();
    assert_eq!(rgb.order, ColorOrder::Rgb);
    assert_eq!(rgb.pixels.data, vec![3, 2, 1, 6, 5, 4]);
}

#[test]
fn test_rgb_into_rgb_is_unchanged() {
    let frame = RawFrame::from_raw(1, 1, ColorOrder::Rgb, vec![1, 2, 3]).unwrap();
    assert_eq!(frame.clone().into_rgb(), frame);
}

#[test]
fn test_resize_stretches_to_exact_size() {
    let frame = solid(640, 360, [10, 20, 30]);
    let resized = resize_bilinear(&frame, 224, 224).unwrap();

    assert_eq!(resized.pixels.shape, vec![224, 224, 3]);
    // a solid color stays solid under bilinear filtering
    assert!(resized.pixels.data.chunks_exact(3).all(|p| p == [10, 20, 30]));
}

#[test]
fn test_resize_upscales_tiny_frame() {
    let frame = solid(1, 1, [200, 100, 0]);
    let resized = resize_bilinear(&frame, 224, 224).unwrap();
    assert_eq!(resized.width(), 224);
    assert_eq!(resized.pixels.data[..3], [200, 100, 0]);
}

#[test]
fn test_resize_is_deterministic() {
    let data: Vec<u8> = (0..30 * 17 * 3).map(|i| (i * 7 % 251) as u8).collect();
    let frame = RawFrame::from_raw(30, 17, ColorOrder::Bgr, data).unwrap();

    let a = resize_bilinear(&frame, 224, 224).unwrap();
    let b = resize_bilinear(&frame, 224, 224).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.order, ColorOrder::Bgr);
}

#[test]
fn test_resize_rejects_zero_area() {
    let pixels = Tensor::new(vec![0, 10, 3], vec![]).unwrap();
    let frame = RawFrame::new(pixels, ColorOrder::Rgb).unwrap();
    assert!(resize_bilinear(&frame, 224, 224).is_err());
}

#[test]
fn test_resize_rejects_four_channels() {
    let pixels = Tensor::new(vec![2, 2, 4], vec![0u8; 16]).unwrap();
    let frame = RawFrame::new(pixels, ColorOrder::Rgb).unwrap();
    let err = resize_bilinear(&frame, 224, 224).unwrap_err();
    assert!(err.to_string().contains("3 channels"));
}

#[test]
fn test_hand_built_frame_reports_zero_dims() {
    let frame = RawFrame {
        pixels: Tensor::new(vec![4, 4], vec![0u8; 16]).unwrap(),
        order: ColorOrder::Bgr,
    };
    assert_eq!((frame.width(), frame.height(), frame.channels()), (0, 0, 0));
    assert!(frame.is_empty());
    assert!(resize_bilinear(&frame, 8, 8).is_err());
    // nothing to swap, the buffer is left alone
    assert_eq!(frame.into_rgb().pixels.data, vec![0u8; 16]);
}
