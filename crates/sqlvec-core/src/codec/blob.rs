//! Binary form: a headerless, native-order array of elements.
//!
//! The element type is not stored in the blob; it comes from the column
//! declaration or the calling function.

use crate::error::{VectorError, VectorResult};
use crate::vector::{ElementType, Vector, MAX_DIMS};

/// Wrap a user-supplied blob as a borrowed vector.
///
/// # Errors
///
/// Returns [`VectorError::ParseSyntax`] if the length is not a whole number
/// of elements and [`VectorError::DimensionOverflow`] if it holds more than
/// [`MAX_DIMS`] elements.
pub fn parse_blob(element_type: ElementType, bytes: &[u8]) -> VectorResult<Vector<'_>> {
    let size = element_type.size();
    if bytes.len() % size != 0 {
        return Err(VectorError::syntax(format!(
            "invalid vector: blob length {} is not a multiple of {}",
            bytes.len(),
            size
        )));
    }
    if bytes.len() / size > MAX_DIMS {
        return Err(VectorError::DimensionOverflow { max: MAX_DIMS });
    }
    Ok(Vector::wrap_borrowed(element_type, bytes))
}

/// Copy the vector's bytes into `dst`.
///
/// Returns the number of bytes written, or 0 without touching `dst` when it
/// is too small.
pub fn serialize_to_blob(v: &Vector<'_>, dst: &mut [u8]) -> usize {
    let src = v.as_bytes();
    if dst.len() < src.len() {
        return 0;
    }
    dst[..src.len()].copy_from_slice(src);
    src.len()
}

/// The vector's canonical binary encoding.
pub fn to_blob(v: &Vector<'_>) -> Vec<u8> {
    v.as_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f32_bytes(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_ne_bytes()).collect()
    }

    #[test]
    fn test_parse_blob_borrows() {
        let bytes = f32_bytes(&[1.0, -2.5]);
        let v = parse_blob(ElementType::Float32, &bytes).unwrap();
        assert!(v.is_borrowed());
        assert_eq!(v.dims(), 2);
        assert_eq!(v.to_f32_vec(), vec![1.0, -2.5]);
    }

    #[test]
    fn test_parse_blob_bad_length() {
        let err = parse_blob(ElementType::Float32, &[0u8; 7]).unwrap_err();
        assert!(matches!(err, VectorError::ParseSyntax { .. }));
    }

    #[test]
    fn test_parse_blob_too_many_elements() {
        let bytes = vec![0u8; (MAX_DIMS + 1) * 4];
        let err = parse_blob(ElementType::Float32, &bytes).unwrap_err();
        assert_eq!(err, VectorError::DimensionOverflow { max: MAX_DIMS });
    }

    #[test]
    fn test_serialize_is_byte_exact() {
        let bytes = f32_bytes(&[0.1, 1e-30, 7.0]);
        let v = parse_blob(ElementType::Float32, &bytes).unwrap();
        let mut dst = vec![0u8; 16];
        assert_eq!(serialize_to_blob(&v, &mut dst), 12);
        assert_eq!(&dst[..12], &bytes[..]);
        assert_eq!(to_blob(&v), bytes);
    }

    #[test]
    fn test_serialize_into_short_buffer() {
        let bytes = f32_bytes(&[1.0, 2.0]);
        let v = parse_blob(ElementType::Float32, &bytes).unwrap();
        let mut dst = [0xAAu8; 4];
        assert_eq!(serialize_to_blob(&v, &mut dst), 0);
        assert_eq!(dst, [0xAA; 4]);
    }
}
