use deepcheck_base::{Tensor, TensorError};

#[test]
fn test_tensor_new_valid() {
    let tensor = Tensor::new(vec![2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    assert_eq!(tensor.shape, vec![2, 3]);
    assert_eq!(tensor.len(), 6);
    assert_eq!(tensor.ndim(), 2);
}

#[test]
fn test_tensor_new_shape_mismatch() {
    let result = Tensor::new(vec![2, 3], vec![1.0, 2.0, 3.0]);
    assert_eq!(
        result.unwrap_err(),
        TensorError::ShapeMismatch {
            expected: 6,
            got: 3
        }
    );
}

#[test]
fn test_tensor_new_overflow() {
    let result = Tensor::<u8>::new(vec![usize::MAX, 2], vec![]);
    assert!(matches!(result, Err(TensorError::ShapeOverflow)));
}

#[test]
fn test_tensor_zeros() {
    let tensor = Tensor::<f32>::zeros(vec![3, 4, 4]).unwrap();
    assert_eq!(tensor.data, vec![0.0; 48]);
}

#[test]
fn test_tensor_zero_dimension_is_empty() {
    let tensor = Tensor::<u8>::new(vec![0, 640, 3], vec![]).unwrap();
    assert!(tensor.is_empty());
}

#[test]
fn test_dims3() {
    let tensor = Tensor::new(vec![2, 3, 4], vec![0u8; 24]).unwrap();
    assert_eq!(tensor.dims3(), Some((2, 3, 4)));

    let flat = Tensor::new(vec![24], vec![0u8; 24]).unwrap();
    assert_eq!(flat.dims3(), None);
}

#[test]
fn test_debug_output_is_truncated() {
    let tensor = Tensor::new(vec![100], vec![7u8; 100]).unwrap();
    let debug = format!("{tensor:?}");
    assert!(debug.contains("len: 100"));
    assert!(debug.len() < 120);
}
